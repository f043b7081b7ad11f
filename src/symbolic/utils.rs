// the collection of utility functions mainly for bracket processing of user input

/// true if every bracket in the string is closed by a matching one (strings without brackets
/// are balanced too)
pub fn brackets_balanced(s: &str) -> bool {
    let mut stack = Vec::new();
    for c in s.chars() {
        match c {
            '(' | '{' | '[' => stack.push(c),
            ')' => {
                if stack.pop() != Some('(') {
                    return false;
                }
            }
            '}' => {
                if stack.pop() != Some('{') {
                    return false;
                }
            }
            ']' => {
                if stack.pop() != Some('[') {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}

/// byte position of the first occurrence of `c` that is outside round brackets
pub fn find_char_positions_outside_brackets(s: &str, c: char) -> Option<usize> {
    let mut depth: usize = 0;
    for (i, ch) in s.char_indices() {
        if ch == '(' {
            depth += 1;
        } else if ch == ')' {
            depth = depth.saturating_sub(1);
        } else if ch == c && depth == 0 {
            return Some(i);
        }
    }
    None
}

/// `y = x^2` -> `x^2`; text without a top level `=` is returned trimmed
pub fn strip_lhs(input: &str) -> &str {
    match find_char_positions_outside_brackets(input, '=') {
        Some(pos) => input[pos + 1..].trim(),
        None => input.trim(),
    }
}

/// `num_values` evenly spaced values from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    match num_values {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num_values as f64 - 1.0);
            (0..num_values)
                .map(|i| if i + 1 == num_values { end } else { start + i as f64 * step })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brackets_balanced() {
        assert!(brackets_balanced("sin(x)*(y+1)"));
        assert!(brackets_balanced("x"));
        assert!(!brackets_balanced("(x + y"));
        assert!(!brackets_balanced("x)("));
    }

    #[test]
    fn test_strip_lhs() {
        assert_eq!(strip_lhs("y = x^2"), "x^2");
        assert_eq!(strip_lhs("  t + 1 "), "t + 1");
        assert_eq!(strip_lhs("f(x) = sin(x)"), "sin(x)");
    }

    #[test]
    fn test_linspace_hits_both_ends() {
        let v = linspace(-3.0, 3.0, 7);
        assert_eq!(v.len(), 7);
        assert_eq!(v[0], -3.0);
        assert_eq!(v[6], 3.0);
        assert!((v[3]).abs() < 1e-15);
    }
}
