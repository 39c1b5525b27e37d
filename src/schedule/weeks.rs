use std::sync::LazyLock;

use regex::Regex;

use super::models::WeekSpec;

/// Separators between two parts of a week list
const SEPARATORS: [char; 3] = [',', '，', '、'];

/// Unit written after the week numbers, i.e.: `3-5周`
const WEEK_UNIT: char = '周';

static RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<from>[0-9]+)\s*[-~–]\s*(?P<to>[0-9]+)$").unwrap());

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").unwrap());

/// Parse the week cell of a table, such as `1-4, 6、8周`
pub fn parse(text: &str) -> WeekSpec {
    let mut weeks = WeekSpec::default();

    for token in super::fold_width(text).split(SEPARATORS) {
        let token = token.trim().trim_end_matches(WEEK_UNIT).trim();
        if token.is_empty() {
            continue;
        }

        if let Some(captures) = RANGE.captures(token) {
            // Overflowing numbers can't be a week anyway
            let bounds = (
                captures["from"].parse::<u32>(),
                captures["to"].parse::<u32>(),
            );
            if let (Ok(from), Ok(to)) = bounds {
                weeks.insert_range(from, to);
            }
            continue;
        }

        NUMBER
            .find_iter(token)
            .filter_map(|number| number.as_str().parse::<u32>().ok())
            .for_each(|week| weeks.insert(week));
    }

    weeks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weeks<const N: usize>(weeks: [u32; N]) -> WeekSpec {
        weeks.into_iter().collect()
    }

    #[test]
    fn ranges_in_both_directions() {
        assert_eq!(parse("3-5"), weeks([3, 4, 5]));
        assert_eq!(parse("5-3"), weeks([3, 4, 5]));
        assert_eq!(parse("5 ~ 3周"), weeks([3, 4, 5]));
        assert_eq!(parse("7–7"), weeks([7]));
    }

    #[test]
    fn enumerations() {
        assert_eq!(parse("1, 3，5、7"), weeks([1, 3, 5, 7]));
        assert_eq!(parse("1-3,2-4"), weeks([1, 2, 3, 4]));
        assert_eq!(parse("第9周"), weeks([9]));
        assert_eq!(parse("10 12"), weeks([10, 12]));
        assert_eq!(parse("１-４"), weeks([1, 2, 3, 4]));
        assert_eq!(parse("第１２周、１４"), weeks([12, 14]));
    }

    #[test]
    fn noise_is_dropped() {
        assert!(parse("").is_empty());
        assert!(parse(" , 、").is_empty());
        assert!(parse("全部").is_empty());
        assert!(parse("99999999999999999999").is_empty());
        assert_eq!(parse("50-99999999999999999999, 2"), weeks([2]));
    }
}
