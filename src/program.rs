use crate::error::ParseError;

/// Parse a single line of comma-separated integers into a program.
///
/// The whole text is trimmed first, so a trailing newline from the input
/// file is accepted. Each cell is trimmed as well.
pub fn parse(text: &str) -> Result<Vec<i64>, ParseError> {
    text.trim()
        .split(',')
        .enumerate()
        .map(|(position, cell)| {
            let cell = cell.trim();
            cell.parse::<i64>().map_err(|_| ParseError {
                position,
                cell: cell.to_string(),
            })
        })
        .collect()
}

/// Render a program back into its comma-separated form.
pub fn format(program: &[i64]) -> String {
    program
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn format_then_parse_is_identity(program in prop::collection::vec(any::<i64>(), 1..64)) {
            prop_assert_eq!(parse(&format(&program)).unwrap(), program);
        }
    }
}
