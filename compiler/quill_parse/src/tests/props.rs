use proptest::prelude::*;

use crate::dump::dump_program;
use crate::parse;

proptest! {
    #[test]
    fn parser_terminates_on_arbitrary_input(
        source in "[a-z0-9 +*/<>{}()\\[\\],.=\"@:;!?~\n-]{0,48}"
    ) {
        let output = parse(&source);
        for error in &output.errors {
            prop_assert!(error.span.start as usize <= source.len());
        }
    }

    #[test]
    fn bare_and_bracketed_lists_agree(items in prop::collection::vec(0i64..1000, 2..8)) {
        let joined = items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        let bare = parse(&joined);
        let bracketed = parse(&format!("[{joined}]"));
        prop_assert!(bare.errors.is_empty());
        prop_assert!(bracketed.errors.is_empty());
        prop_assert_eq!(
            dump_program(&bare.program, &bare.arena),
            dump_program(&bracketed.program, &bracketed.arena)
        );
    }
}
