//! Natural, case-insensitive string ordering.
//!
//! Digit runs compare by numeric value, so `"img2" < "img10"`; everything
//! else compares character by character after lowercasing. This is the
//! default ordering of `Collection::sort`.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Compare two strings in natural, case-insensitive order.
pub fn compare(a: &str, b: &str) -> Ordering {
    let mut left = a.trim_start().chars().peekable();
    let mut right = b.trim_start().chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let lhs = take_digits(&mut left);
                let rhs = take_digits(&mut right);
                match compare_digit_runs(&lhs, &rhs) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_lowercase().cmp(y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

/// Compare two runs of ASCII digits by value without parsing (runs may be
/// longer than any integer type).
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_sig = a.trim_start_matches('0');
    let b_sig = b.trim_start_matches('0');
    a_sig
        .len()
        .cmp(&b_sig.len())
        .then_with(|| a_sig.cmp(b_sig))
        // "01" sorts before "1"
        .then_with(|| b.len().cmp(&a.len()))
}
