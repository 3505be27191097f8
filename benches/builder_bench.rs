// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Performance benchmarks for tugmacro readers and builders.
//!
//! Run with:
//! ```bash
//! cargo bench -p tugmacro
//! ```
//!
//! # Benchmark Categories
//!
//! 1. **Reading**: Binding analysis and member partitioning over parsed types
//! 2. **Building**: Composing declarations through the builder DSL
//! 3. **Expansion**: A member macro run end to end

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use tugmacro::builder::{memberwise_initializer, struct_decl, Param, VariableBuilder};
use tugmacro::reader::{AttributeView, DeclGroup, MemberBlockReader, StructReader};
use tugmacro::{expand_members, ExpansionContext, MacroResult, MemberMacro};
use tugmacro_syntax::{parse_decl, Decl, ParseOptions};

// =============================================================================
// Test Data Generation
// =============================================================================

/// A struct with `num_props` stored properties, a few of them destructured.
fn generate_struct(num_props: usize) -> String {
    let mut code = String::from("@MemberwiseInit\npublic struct Model {\n");
    for i in 0..num_props {
        if i % 5 == 0 {
            code.push_str(&format!("    let (first{i}, second{i}): (Int, String)\n"));
        } else if i % 3 == 0 {
            code.push_str(&format!("    var value{i}: Double = {i}.5\n"));
        } else {
            code.push_str(&format!("    var name{i}: String\n"));
        }
    }
    code.push_str("    var label: String {\n        return \"model\"\n    }\n}\n");
    code
}

struct MemberwiseInit;

impl MemberMacro for MemberwiseInit {
    fn name(&self) -> &str {
        "MemberwiseInit"
    }

    fn expansion(
        &self,
        _attribute: AttributeView<'_>,
        group: DeclGroup<'_>,
        _context: &mut ExpansionContext,
    ) -> MacroResult<Vec<Decl>> {
        Ok(vec![memberwise_initializer(&group.stored_properties(), group.visibility())?])
    }
}

// =============================================================================
// Reader Benchmarks
// =============================================================================

fn bench_read_properties(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_properties");

    for size in [10, 50, 200].iter() {
        let decl = parse_decl(&generate_struct(*size)).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_props", size)),
            &decl,
            |b, decl| {
                b.iter(|| {
                    let reader = StructReader::new(decl).unwrap();
                    let _ = black_box(reader.stored_properties());
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// Builder Benchmarks
// =============================================================================

fn bench_build_struct(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_struct");

    for size in [10, 50, 200].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_members", size)),
            size,
            |b, size| {
                b.iter(|| {
                    let members = (0..*size).map(|i| {
                        VariableBuilder::variable(format!("field{i}"))
                            .of_type("Int")
                            .initializer(i)
                            .build()
                            .unwrap()
                    });
                    let _ = black_box(struct_decl("Generated").members(members).build().unwrap());
                });
            },
        );
    }

    group.finish();
}

fn bench_memberwise_initializer(c: &mut Criterion) {
    let mut group = c.benchmark_group("memberwise_initializer");

    for size in [10, 50].iter() {
        let decl = parse_decl(&generate_struct(*size)).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_props", size)),
            &decl,
            |b, decl| {
                let properties = StructReader::new(decl).unwrap().stored_properties();
                b.iter(|| {
                    let _ = black_box(memberwise_initializer(&properties, None).unwrap());
                });
            },
        );
    }

    group.finish();
}

fn bench_param_render(c: &mut Criterion) {
    c.bench_function("param_render", |b| {
        let param = Param::new("completion", "(Result<Data, Error>) -> Void")
            .label("onDone")
            .escaping()
            .default_value("{ _ in }");
        b.iter(|| black_box(param.render()));
    });
}

// =============================================================================
// Expansion Benchmarks
// =============================================================================

fn bench_expand_members(c: &mut Criterion) {
    let mut group = c.benchmark_group("expand_members");

    for size in [10, 50].iter() {
        let decl = parse_decl(&generate_struct(*size)).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_props", size)),
            &decl,
            |b, decl| {
                b.iter(|| {
                    let expansion = expand_members(&MemberwiseInit, decl, ParseOptions::default());
                    let _ = black_box(expansion.output.unwrap());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_read_properties,
    bench_build_struct,
    bench_memberwise_initializer,
    bench_param_render,
    bench_expand_members,
);

criterion_main!(benches);
