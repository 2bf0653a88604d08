//! Properties of core operations over generated inputs.

use proptest::prelude::*;

use crate::common::run;

fn list(items: &[i64]) -> String {
    let items: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

proptest! {
    #[test]
    fn slices_clamp_instead_of_failing(
        items in prop::collection::vec(-100i64..100, 0..12),
        start in -20i64..20,
        end in -20i64..20,
    ) {
        let source = format!("let xs = {}\nlen(xs[{start}:{end}])", list(&items));
        let len: usize = run(&source).parse().unwrap();
        prop_assert!(len <= items.len());
    }

    #[test]
    fn comma_lists_match_bracketed_arrays(items in prop::collection::vec(0i64..1000, 2..8)) {
        let bare: Vec<String> = items.iter().map(ToString::to_string).collect();
        let source = format!("let a = {}\nlet b = {}\na == b", bare.join(", "), list(&items));
        prop_assert_eq!(run(&source), "true");
    }

    #[test]
    fn integer_arithmetic_matches_i64(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        prop_assert_eq!(run(&format!("({a}) + ({b})")), (a + b).to_string());
        prop_assert_eq!(run(&format!("({a}) * ({b})")), (a * b).to_string());
        prop_assert_eq!(run(&format!("({a}) - ({b})")), (a - b).to_string());
    }

    #[test]
    fn natural_sort_orders_numeric_suffixes(mut numbers in prop::collection::vec(0u32..10_000, 1..10)) {
        let names: Vec<String> = numbers.iter().map(|n| format!("\"f{n}\"")).collect();
        let source = format!("let xs = [{}]\nxs.sort().join(\",\")", names.join(", "));
        numbers.sort_unstable();
        let expected: Vec<String> = numbers.iter().map(|n| format!("f{n}")).collect();
        prop_assert_eq!(run(&source), expected.join(","));
    }

    #[test]
    fn full_slices_are_equal_copies(items in prop::collection::vec(-50i64..50, 0..10)) {
        let source = format!("let a = {}\nlet b = a[:]\na == b", list(&items));
        prop_assert_eq!(run(&source), "true");
    }
}
