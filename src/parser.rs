//! Line-based menu item recognizer.
//!
//! PDF text extraction gives us a flat list of lines with no structure. Dishes
//! show up either as a name line followed by a price line, or as a single line
//! carrying both. The scan below walks the lines with a cursor that moves one
//! or two lines at a time depending on which of those shapes matched.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use crate::MenuItem;

/// Prices must fall strictly below this value.
pub const MAX_PRICE: u64 = 10_000;

/// Minimum number of characters in a cleaned dish name.
pub const MIN_NAME_LEN: usize = 3;

// Matched against the start of the lowercased, trimmed line.
static SKIP_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"^\d+$",
        r"^page\s*\d*$",
        r"^menu$",
        r"^price\s*list$",
        r"^\d{10,}$",
        r"^contact",
        r"^address",
        r"^authentic home made food",
        r"^per plate",
        r"^keep calm",
        r"^start/refresh",
        r"^with freshly",
        r"^@\s*rs\.",
        r"^breakfast",
        r"^tiffen",
        r"^items",
        r"^delights",
        r"^biryani",
        r"^chinese",
        r"^meals",
    ])
    .unwrap()
});

const SECTION_HEADERS: &[&str] = &[
    "breakfast / tiffen items",
    "chinese delights",
    "veg meals",
    "non-veg meals",
];

const NOISE_WORDS: &[&str] = &[
    "menu", "price", "veg", "non", "total", "subtotal", "tax", "phone", "contact", "address",
    "page",
];

// Tried in order; the first pattern that matches decides the line.
static SAME_LINE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(.+?)\s+(\d+)$").unwrap(),
        Regex::new(r"(.+?)\s*-\s*(\d+)$").unwrap(),
        Regex::new(r"(.+?)\s*:\s*(\d+)$").unwrap(),
    ]
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NAME_JUNK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s\-&]").unwrap());
static TRAILING_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\d+$").unwrap());
static PER_PLATE_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d+per\s+plate\s*").unwrap());
static LEADING_DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+").unwrap());

static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[₹RsIN,\s]").unwrap());
static DIGIT_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static DECIMAL_DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d$").unwrap());

/// A dish recognised on one or two lines, before it is given an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dish {
    pub name: String,
    pub price: u32,
}

/// Outcome of one cursor step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognition {
    pub dish: Option<Dish>,
    /// Lines consumed by this step, 1 or 2.
    pub consumed: usize,
}

impl Recognition {
    fn skip() -> Self {
        Self {
            dish: None,
            consumed: 1,
        }
    }
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT_RE.is_match(c.encode_utf8(&mut buf))
}

/// Value of any Unicode decimal digit (`१`, `٣`, `５`, ...), not just ASCII.
///
/// Decimal digits are only ever assigned as contiguous runs of 0 to 9, so the
/// value is the distance from the start of the run, modulo 10.
pub fn decimal_digit_value(c: char) -> Option<u32> {
    if let Some(value) = c.to_digit(10) {
        return Some(value);
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let mut start = c as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some((c as u32 - start) % 10)
}

/// Reads the first run of digits out of a price cell such as `"₹ 1,250"`,
/// `"Rs. 180/-"` or `"₹ १८०"`. Returns 0 when there are no digits at all.
///
/// Runs too long for a `u64` saturate, so they still fail [`is_valid_price`].
pub fn clean_price(text: &str) -> u64 {
    let stripped = CURRENCY_RE.replace_all(text, "");
    let Some(run) = DIGIT_RUN_RE.find(&stripped) else {
        return 0;
    };
    run.as_str()
        .chars()
        .filter_map(decimal_digit_value)
        .try_fold(0u64, |acc, digit| acc.checked_mul(10)?.checked_add(u64::from(digit)))
        .unwrap_or(u64::MAX)
}

pub fn is_valid_price(price: u64) -> bool {
    price > 0 && price < MAX_PRICE
}

fn valid_price(price: u64) -> Option<u32> {
    if is_valid_price(price) {
        u32::try_from(price).ok()
    } else {
        None
    }
}

pub fn clean_dish_name(name: &str) -> String {
    let name = WHITESPACE_RE.replace_all(name, " ");
    let name = NAME_JUNK_RE.replace_all(&name, "");
    let name = TRAILING_NUMBER_RE.replace(&name, "");
    let name = PER_PLATE_PREFIX_RE.replace(&name, "");
    let name = LEADING_DIGITS_RE.replace(&name, "");
    let name = WHITESPACE_RE.replace_all(&name, " ");
    // A separator left behind by a stripped price, e.g. "Paneer Tikka -".
    name.trim_matches(|c: char| c == '-' || c.is_whitespace())
        .to_string()
}

/// Headers, footers, page numbers and phone numbers.
pub fn is_noise_line(trimmed: &str) -> bool {
    let lower = trimmed.to_lowercase();
    SKIP_PATTERNS.is_match(&lower) || SECTION_HEADERS.contains(&lower.as_str())
}

pub fn has_noise_word(name: &str) -> bool {
    let lower = name.to_lowercase();
    NOISE_WORDS.iter().any(|word| lower.contains(word))
}

fn name_len(name: &str) -> usize {
    name.chars().count()
}

/// Runs one step of the scan at `index`.
///
/// A name line followed by a valid price line consumes both lines. Otherwise
/// the line itself is tried as `name price`, `name - price` or `name : price`
/// and only that line is consumed, whether or not it yielded a dish.
pub fn recognize_at<S: AsRef<str>>(lines: &[S], index: usize) -> Recognition {
    let Some(raw) = lines.get(index) else {
        return Recognition::skip();
    };
    let line = raw.as_ref().trim();
    if name_len(line) < MIN_NAME_LEN || is_noise_line(line) {
        return Recognition::skip();
    }

    let name = clean_dish_name(line);
    if name_len(&name) < MIN_NAME_LEN || has_noise_word(&name) {
        return Recognition::skip();
    }

    if let Some(next) = lines.get(index + 1) {
        if let Some(price) = valid_price(clean_price(next.as_ref().trim())) {
            return Recognition {
                dish: Some(Dish { name, price }),
                consumed: 2,
            };
        }
    }

    Recognition {
        dish: same_line_dish(line),
        consumed: 1,
    }
}

fn same_line_dish(line: &str) -> Option<Dish> {
    let caps = SAME_LINE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(line))?;

    let name = clean_dish_name(caps[1].trim());
    if name_len(&name) < MIN_NAME_LEN {
        return None;
    }
    let price = valid_price(clean_price(caps[2].trim()))?;
    Some(Dish { name, price })
}

/// Scans `lines` and returns the items found, with ids starting at 1.
pub fn parse_menu_lines<S: AsRef<str>>(lines: &[S], category: &str) -> Vec<MenuItem> {
    tracing::info!(category, lines = lines.len(), "parsing menu lines");

    let mut items: Vec<MenuItem> = Vec::new();
    let mut cursor = 0;
    while cursor < lines.len() {
        let step = recognize_at(lines, cursor);
        if let Some(dish) = step.dish {
            tracing::debug!(category, name = %dish.name, price = dish.price, "found menu item");
            let id = items.len() as u32 + 1;
            items.push(MenuItem::new(id, dish.name, dish.price, category));
        }
        cursor += step.consumed;
    }

    tracing::info!(category, items = items.len(), "finished parsing menu");
    items
}

pub fn parse_menu_text(text: &str, category: &str) -> Vec<MenuItem> {
    let lines: Vec<&str> = text.split('\n').collect();
    parse_menu_lines(&lines, category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dishes(lines: &[&str]) -> Vec<(String, u32)> {
        parse_menu_lines(lines, "Veg")
            .into_iter()
            .map(|item| (item.name, item.price))
            .collect()
    }

    #[test]
    fn name_then_price_line() {
        let lines = ["Chicken Biryani", "250"];
        assert_eq!(dishes(&lines), vec![("Chicken Biryani".to_string(), 250)]);

        let step = recognize_at(&lines, 0);
        assert_eq!(step.consumed, 2);
    }

    #[test]
    fn same_line_with_dash() {
        assert_eq!(
            dishes(&["Paneer Tikka - 180"]),
            vec![("Paneer Tikka".to_string(), 180)]
        );
    }

    #[test]
    fn same_line_with_colon() {
        assert_eq!(
            dishes(&["Gulab Jamun : 60"]),
            vec![("Gulab Jamun".to_string(), 60)]
        );
    }

    #[test]
    fn same_line_dash_without_spaces() {
        assert_eq!(dishes(&["Dal-120"]), vec![("Dal".to_string(), 120)]);
    }

    #[test]
    fn same_line_step_consumes_one_line() {
        let lines = ["Paneer Tikka - 180", "Jeera Rice"];
        assert_eq!(recognize_at(&lines, 0).consumed, 1);
        assert_eq!(dishes(&lines), vec![("Paneer Tikka".to_string(), 180)]);
    }

    #[test]
    fn price_line_wins_over_same_line_price() {
        let lines = ["Paneer Tikka - 180", "200"];
        let step = recognize_at(&lines, 0);
        assert_eq!(step.consumed, 2);
        assert_eq!(
            step.dish,
            Some(Dish {
                name: "Paneer Tikka".to_string(),
                price: 200
            })
        );
    }

    #[test]
    fn page_and_phone_lines_are_noise() {
        assert!(dishes(&["Page 3"]).is_empty());
        assert!(dishes(&["9876543210"]).is_empty());
        assert!(is_noise_line("Page 3"));
        assert!(is_noise_line("9876543210"));
        assert!(is_noise_line("MENU"));
        assert!(is_noise_line("Price List"));
        assert!(is_noise_line("Contact us on 98765"));
        assert!(is_noise_line("Authentic Home Made Food"));
        assert!(is_noise_line("Biryani Specials"));
        assert!(is_noise_line("Veg Meals"));
        assert!(is_noise_line("@ Rs. 120 each"));
        assert!(!is_noise_line("Chicken Biryani"));
    }

    #[test]
    fn price_out_of_range_is_dropped() {
        assert!(dishes(&["Lobster Thermidor 15000"]).is_empty());
        assert!(dishes(&["Lobster Thermidor", "15000"]).is_empty());
    }

    #[test]
    fn short_name_is_dropped_even_with_price() {
        assert!(dishes(&["Ok!!", "250"]).is_empty());
    }

    #[test]
    fn noise_words_reject_the_name() {
        assert!(dishes(&["Veg Fried Rice", "120"]).is_empty());
        assert!(dishes(&["Grand Total", "560"]).is_empty());
        assert!(has_noise_word("Non Veg Thali"));
        assert!(!has_noise_word("Egg Curry"));
    }

    #[test]
    fn trailing_price_is_stripped_before_lookahead() {
        assert_eq!(
            dishes(&["Butter Naan 2", "40"]),
            vec![("Butter Naan".to_string(), 40)]
        );
    }

    #[test]
    fn blank_and_tiny_lines_are_skipped() {
        let lines = ["", "  ", "ab", "Masala Dosa", "Rs. 90"];
        assert_eq!(dishes(&lines), vec![("Masala Dosa".to_string(), 90)]);
    }

    #[test]
    fn repeated_dishes_are_kept() {
        let lines = ["Idli Vada", "60", "Idli Vada", "60"];
        assert_eq!(dishes(&lines).len(), 2);
    }

    #[test]
    fn ids_count_up_within_category() {
        let items = parse_menu_text("Masala Dosa\n90\nRava Idli - 70\n\nPoori 80\n", "Veg");
        let ids: Vec<u32> = items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(items.iter().all(|item| item.category == "Veg"));
        assert!(items.iter().all(|item| item.description.is_empty() && item.image.is_empty()));
    }

    #[test]
    fn clean_price_handles_currency_noise() {
        assert_eq!(clean_price("₹ 1,250"), 1250);
        assert_eq!(clean_price("Rs. 180/-"), 180);
        assert_eq!(clean_price("INR 99"), 99);
        assert_eq!(clean_price("180 / 220"), 180);
        assert_eq!(clean_price("free"), 0);
        assert_eq!(clean_price("99999999999999999999999"), u64::MAX);
    }

    #[test]
    fn clean_dish_name_steps() {
        assert_eq!(clean_dish_name("Masala   Dosa 90"), "Masala Dosa");
        assert_eq!(clean_dish_name("120per plate Idli"), "Idli");
        assert_eq!(clean_dish_name("2 Gobi Manchurian"), "Gobi Manchurian");
        assert_eq!(clean_dish_name("Chilli Paneer (Dry)!"), "Chilli Paneer Dry");
        assert_eq!(clean_dish_name("Fish & Chips"), "Fish & Chips");
        assert_eq!(clean_dish_name("Paneer Tikka -"), "Paneer Tikka");
    }

    #[test]
    fn non_ascii_digits_are_prices() {
        assert_eq!(decimal_digit_value('७'), Some(7));
        assert_eq!(decimal_digit_value('٠'), Some(0));
        assert_eq!(decimal_digit_value('９'), Some(9));
        assert_eq!(decimal_digit_value('x'), None);

        assert_eq!(clean_price("१८०"), 180);
        assert_eq!(clean_price("₹ ١٢٠"), 120);
        assert_eq!(clean_price("Rs. ２５０/-"), 250);
        assert_eq!(clean_dish_name("Paneer Tikka १८०"), "Paneer Tikka");

        assert_eq!(
            dishes(&["Paneer Tikka", "१८०"]),
            vec![("Paneer Tikka".to_string(), 180)]
        );
        assert_eq!(
            dishes(&["Paneer Tikka १८०"]),
            vec![("Paneer Tikka".to_string(), 180)]
        );
        assert!(dishes(&["Lobster Thermidor", "१५०००"]).is_empty());
    }

    #[test]
    fn price_bounds() {
        assert!(!is_valid_price(0));
        assert!(is_valid_price(1));
        assert!(is_valid_price(9999));
        assert!(!is_valid_price(10_000));
    }
}
