/*!
Textual rendering of sets: the ordinal-aware `Display`, the always-brace-form `to_string_plain`,
tuple notation, and the box-drawn `as_tree` diagram (ported from `original_source`'s
`_build_tree`/`boxify`).
*/

use super::Set;
use std::fmt;

impl fmt::Display for Set {
    /// Formats as a decimal when this set's ordinal is defined, otherwise as `{...}`
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.ordinal() {
            Some(n) => write!(f, "{}", n),
            None => write!(f, "{}", self.to_string_plain()),
        }
    }
}

impl Set {
    /// Always the brace form, even when this set's ordinal is defined. `parse(s.to_string_plain())
    /// == s` for every set `s`.
    pub fn to_string_plain(&self) -> String {
        if self.cardinal() == 0 {
            return "{}".to_string();
        }
        let mut elements: Vec<String> = self.elements().map(|e| e.to_string()).collect();
        elements.sort();
        format!("{{{}}}", elements.join(", "))
    }

    /// Render this set as a Kuratowski tuple `(x, y, ...)`, assuming [`Set::is_tuple`] holds
    pub fn as_tuple(&self) -> String {
        let components = self.tuple_components();
        let rendered: Vec<String> = components.iter().map(|c| c.to_string()).collect();
        format!("({})", rendered.join(", "))
    }

    /// Decode a Kuratowski-encoded tuple back into its (ordered) components
    fn tuple_components(&self) -> Vec<Set> {
        if self.is_singleton() {
            let inner = self.elements().next().expect("singleton has one element");
            let x = inner
                .elements()
                .next()
                .expect("tuple singleton wraps a singleton")
                .clone();
            if x.is_tuple() {
                let mut rest = x.tuple_components();
                let mut result = vec![x];
                result.append(&mut rest);
                result
            } else {
                vec![x.clone(), x]
            }
        } else {
            let mut pair: Vec<&Set> = self.elements().collect();
            pair.sort_by_key(|s| s.cardinal());
            let (a, b) = (pair[0], pair[1]);
            let x = a
                .elements()
                .next()
                .expect("tuple's smaller half is a singleton")
                .clone();
            let b_elements: Vec<Set> = b.elements().cloned().collect();
            let y = b_elements
                .iter()
                .find(|e| **e != x)
                .cloned()
                .unwrap_or_else(|| x.clone());
            if y.is_tuple() && !y.is_singleton() {
                let mut rest = y.tuple_components();
                let mut result = vec![x];
                result.append(&mut rest);
                result
            } else {
                vec![x, y]
            }
        }
    }

    /// A box-drawn hierarchical diagram of this set's membership tree
    pub fn as_tree(&self) -> String {
        boxify(&build_tree(self).0).join("\n")
    }
}

/// Python's `str.center(width)`: padding favours the right, except that the extra character
/// lands on the left when `width` is odd and the margin is odd too (CPython's exact rule).
fn center(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if width <= len {
        return s.to_string();
    }
    let margin = width - len;
    let left = margin / 2 + (margin & width & 1);
    let right = margin - left;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
}

fn boxify(lines: &[String]) -> Vec<String> {
    let size = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let mut result = vec![format!("\u{2554}{}\u{2557}", "\u{2550}".repeat(size + 2))];
    for line in lines {
        let pad = size - line.chars().count();
        result.push(format!("\u{2551} {}{} \u{2551}", line, " ".repeat(pad)));
    }
    result.push(format!("\u{255a}{}\u{255d}", "\u{2550}".repeat(size + 2)));
    result
}

/// Returns the lines of the tree for this set's root, plus their common width
fn build_tree(set: &Set) -> (Vec<String>, usize) {
    let this = match set.ordinal() {
        Some(n) => n.to_string(),
        None => ".".to_string(),
    };
    let cardinal = set.cardinal();
    if cardinal == 0 {
        let width = this.chars().count();
        return (vec![this], width);
    }
    if cardinal == 1 {
        let only = set.elements().next().expect("cardinal 1 has an element");
        let (body, child_width) = build_tree(only);
        let size = this.chars().count().max(child_width);
        let mut lines = vec![center(&this, size), center("\u{2551}", size)];
        lines.extend(body.iter().map(|line| center(line, size)));
        return (lines, size);
    }

    let mut children: Vec<&Set> = set.elements().collect();
    children.sort();
    let trees: Vec<(Vec<String>, usize)> = children.iter().map(|c| build_tree(c)).collect();
    let sum_widths: usize = trees.iter().map(|(_, w)| *w).sum();
    let tail_count = trees.len() - 1;
    let size = this.chars().count().max(sum_widths + tail_count);
    let middle = size / 2;

    let (mut body, mut length) = trees[0].clone();
    let mut links = format!("{}\u{2554}", " ".repeat(length / 2));
    let mut roots = Vec::new();
    for (tail_lines, tail_width) in &trees[1..] {
        let mut tail_lines = tail_lines.clone();
        let tail_width = *tail_width;
        length += 1;
        roots.push(length + tail_width / 2);
        for line in body.iter_mut() {
            line.push(' ');
        }
        while body.len() < tail_lines.len() {
            body.push(" ".repeat(length));
        }
        while tail_lines.len() < body.len() {
            tail_lines.push(" ".repeat(tail_width));
        }
        for (i, extra) in tail_lines.iter().enumerate() {
            body[i].push_str(extra);
        }
        length += tail_width;
    }

    let root_count = roots.len();
    for (i, &root) in roots.iter().enumerate() {
        let links_len = links.chars().count();
        if links_len <= middle && root > middle {
            links.push_str(&"\u{2550}".repeat(middle - links_len));
            links.push('\u{2569}');
            links.push_str(&"\u{2550}".repeat(root - middle - 1));
        } else {
            links.push_str(&"\u{2550}".repeat(root.saturating_sub(links_len)));
        }
        if root == middle {
            links.push('\u{256c}');
        } else if i < root_count - 1 {
            links.push('\u{2566}');
        } else {
            links.push('\u{2557}');
        }
    }
    let links_len = links.chars().count();
    links.push_str(&" ".repeat(size.saturating_sub(links_len)));
    let body: Vec<String> = body.iter().map(|line| center(line, size)).collect();

    let mut result = vec![center(&this, size), links];
    result.extend(body);
    (result, size)
}
