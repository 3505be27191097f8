// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use tugmacro_syntax::Attribute;

node_reader!(
    /// An attribute such as `@MainActor` or `@available(*, deprecated)`.
    AttributeView => Attribute
);

impl<'a> AttributeView<'a> {
    /// The attribute name without the `@`.
    pub fn name(&self) -> &'a str {
        self.node.name.text()
    }

    /// The raw argument text between the parentheses.
    pub fn argument_text(&self) -> Option<&'a str> {
        self.node.arguments.as_ref().map(|a| a.text.as_str())
    }

    /// Arguments split at top-level commas and trimmed.
    pub fn arguments(&self) -> Vec<&'a str> {
        self.argument_text()
            .map(split_top_level)
            .unwrap_or_default()
    }

    /// The value of a `label: value` argument.
    pub fn labeled_argument(&self, label: &str) -> Option<&'a str> {
        self.arguments().into_iter().find_map(|arg| {
            let (found, value) = arg.split_once(':')?;
            (found.trim() == label).then(|| value.trim())
        })
    }
}

fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = text[start..].trim();
    if !last.is_empty() {
        parts.push(last);
    }
    parts
}
