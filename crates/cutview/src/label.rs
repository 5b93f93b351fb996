//! Letters, ordinals and the labels derived from them.
//!
//! Every object a cut-view session creates carries a `{letter}{ordinal}`
//! tag at the start of its label, followed by a marker saying what it is:
//!
//! | Object    | Label                          |
//! |-----------|--------------------------------|
//! | Plane     | `Cutplane_{letter}`            |
//! | SubLink   | `{tag}_Link_{original}`        |
//! | CutCube   | `{tag}_Cut_Cube`               |
//! | CutResult | `{tag}_Cut_{original}`         |
//! | Group     | `Cut_{letter}`                 |

use std::fmt;

/// Prefix of a cutting plane's label; the letter follows it.
pub const PLANE_PREFIX: &str = "Cutplane_";
/// Marker between tag and original label on a reference.
pub const LINK_MARKER: &str = "_Link_";
/// Marker between tag and original label on a cut result.
pub const CUT_MARKER: &str = "_Cut_";
/// Suffix of a cut box label.
pub const CUBE_SUFFIX: &str = "_Cut_Cube";
/// Top-level group holding every cut view.
pub const ALL_CUTVIEWS: &str = "All_Cutviews";
/// Subgroup holding the cutting planes.
pub const CUT_PLANES: &str = "Cut_Planes";

/// Session letter, `A` to `Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Letter(char);

impl Letter {
    /// Number of letters available.
    pub const COUNT: usize = 26;

    /// Letter from an uppercase ASCII character.
    pub fn new(c: char) -> Option<Self> {
        c.is_ascii_uppercase().then_some(Self(c))
    }

    /// All letters in alphabet order.
    pub fn all() -> impl Iterator<Item = Letter> {
        ('A'..='Z').map(Letter)
    }

    /// The character.
    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<char> for Letter {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Letter::new(c.to_ascii_uppercase()).ok_or(c)
    }
}

/// 1-based position in discovery order.
///
/// Displayed zero-padded to three digits; larger ordinals widen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ordinal(u32);

impl Ordinal {
    /// Ordinal from a 1-based index. Zero is not an ordinal.
    pub fn new(n: u32) -> Option<Self> {
        (n > 0).then_some(Self(n))
    }

    /// Ordinal for a 0-based index.
    pub fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// 1-based value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Ordinals `1..=n`.
    pub fn range(n: usize) -> impl Iterator<Item = Ordinal> {
        (0..n).map(Ordinal::from_index)
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// Letter plus ordinal, the shared prefix of a session's labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag {
    /// Session letter.
    pub letter: Letter,
    /// Position in discovery order.
    pub ordinal: Ordinal,
}

impl Tag {
    /// Tag for a letter and ordinal.
    pub fn new(letter: Letter, ordinal: Ordinal) -> Self {
        Self { letter, ordinal }
    }

    /// `{tag}_Link_`
    pub fn link_prefix(&self) -> String {
        format!("{self}{LINK_MARKER}")
    }

    /// `{tag}_Link_{original}`
    pub fn link_label(&self, original: &str) -> String {
        format!("{}{}", self.link_prefix(), original)
    }

    /// `{tag}_Cut_Cube`
    pub fn cube_label(&self) -> String {
        format!("{self}{CUBE_SUFFIX}")
    }

    /// `{tag}_Cut_{original}`
    pub fn cut_label(&self, original: &str) -> String {
        format!("{self}{CUT_MARKER}{original}")
    }

    /// Original label carried by one of this tag's reference labels.
    pub fn original_from_link<'a>(&self, label: &'a str) -> Option<&'a str> {
        label.strip_prefix(&self.link_prefix())
    }

    /// Original label carried by one of this tag's cut result labels.
    pub fn original_from_cut<'a>(&self, label: &'a str) -> Option<&'a str> {
        label.strip_prefix(&format!("{self}{CUT_MARKER}"))
    }

    /// Split a label into its leading tag and the remainder.
    ///
    /// The tag is one letter followed by at least three digits.
    pub fn parse(label: &str) -> Option<(Tag, &str)> {
        let mut chars = label.chars();
        let letter = Letter::new(chars.next()?)?;
        let rest = chars.as_str();
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits < 3 {
            return None;
        }
        let ordinal = Ordinal::new(rest[..digits].parse().ok()?)?;
        Some((Tag::new(letter, ordinal), &rest[digits..]))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.ordinal)
    }
}

/// `Cutplane_{letter}`
pub fn plane_label(letter: Letter) -> String {
    format!("{PLANE_PREFIX}{letter}")
}

/// `Cut_{letter}`
pub fn letter_group_label(letter: Letter) -> String {
    format!("Cut_{letter}")
}

/// Letter carried by a cutting plane label.
pub fn plane_letter(label: &str) -> Option<Letter> {
    label
        .strip_prefix(PLANE_PREFIX)?
        .chars()
        .next()
        .and_then(Letter::new)
}

/// Letter of a `Cut_{letter}` group label.
pub fn group_letter(label: &str) -> Option<Letter> {
    let mut chars = label.strip_prefix("Cut_")?.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Letter::new(c),
        _ => None,
    }
}

/// True if the label names a cut result of `letter`: tagged, followed by
/// the cut marker, and not a cut box.
pub fn is_cut_result(label: &str, letter: Letter) -> bool {
    match Tag::parse(label) {
        Some((tag, rest)) => {
            tag.letter == letter && rest.starts_with(CUT_MARKER) && !label.ends_with(CUBE_SUFFIX)
        }
        None => false,
    }
}

/// Collapse spacing and case variants of a group label, so `All Cutviews`
/// and `all-cutviews` compare equal to `All_Cutviews`.
pub fn normalize(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(c: char, n: u32) -> Tag {
        Tag::new(Letter::new(c).unwrap(), Ordinal::new(n).unwrap())
    }

    #[test]
    fn labels_share_tag() {
        let t = tag('A', 1);
        assert_eq!(t.link_label("S1"), "A001_Link_S1");
        assert_eq!(t.cube_label(), "A001_Cut_Cube");
        assert_eq!(t.cut_label("S1"), "A001_Cut_S1");
        assert_eq!(plane_label(t.letter), "Cutplane_A");
        assert_eq!(letter_group_label(t.letter), "Cut_A");
    }

    #[test]
    fn wide_ordinals_are_not_truncated() {
        assert_eq!(tag('B', 42).to_string(), "B042");
        assert_eq!(tag('B', 1234).to_string(), "B1234");
        let (parsed, rest) = Tag::parse("B1234_Cut_x").unwrap();
        assert_eq!(parsed, tag('B', 1234));
        assert_eq!(rest, "_Cut_x");
    }

    #[test]
    fn original_label_round_trips_byte_for_byte() {
        let t = tag('C', 7);
        for original in [
            "Body",
            "Part_Link_Cut_",
            "A001_Cut_Cube",
            "éléments / 3",
            "",
            " spaced  ",
        ] {
            assert_eq!(t.original_from_link(&t.link_label(original)), Some(original));
            assert_eq!(t.original_from_cut(&t.cut_label(original)), Some(original));
        }
        assert_eq!(t.original_from_link("C008_Link_x"), None);
    }

    #[test]
    fn parse_rejects_untagged_labels() {
        assert!(Tag::parse("Cut_A").is_none());
        assert!(Tag::parse("A01_Cut_x").is_none());
        assert!(Tag::parse("a001_Cut_x").is_none());
        assert!(Tag::parse("A000_Cut_x").is_none());
        assert!(Tag::parse("").is_none());
    }

    #[test]
    fn plane_letter_extraction() {
        assert_eq!(plane_letter("Cutplane_Q"), Letter::new('Q'));
        assert_eq!(plane_letter("Cutplane_Q_old"), Letter::new('Q'));
        assert_eq!(plane_letter("Cutplane_"), None);
        assert_eq!(plane_letter("Cutplane_q"), None);
        assert_eq!(plane_letter("XY_Plane"), None);
    }

    #[test]
    fn group_letter_extraction() {
        assert_eq!(group_letter("Cut_B"), Letter::new('B'));
        assert_eq!(group_letter("Cut_Planes"), None);
        assert_eq!(group_letter("Cut_b"), None);
        assert_eq!(group_letter("A001_Cut_B"), None);
    }

    #[test]
    fn cut_results_exclude_cubes() {
        let a = Letter::new('A').unwrap();
        assert!(is_cut_result("A001_Cut_S1", a));
        assert!(!is_cut_result("A001_Cut_Cube", a));
        assert!(!is_cut_result("A001_Link_S1", a));
        assert!(!is_cut_result("B001_Cut_S1", a));
        assert!(!is_cut_result("Cut_A", a));
    }

    #[test]
    fn letters() {
        assert_eq!(Letter::all().count(), Letter::COUNT);
        assert_eq!(Letter::try_from('d'), Ok(Letter('D')));
        assert_eq!(Letter::try_from('7'), Err('7'));
        assert_eq!(Ordinal::range(3).map(Ordinal::get).collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn normalize_variants() {
        assert_eq!(normalize("All Cutviews"), normalize(ALL_CUTVIEWS));
        assert_eq!(normalize(" all-cutviews "), normalize(ALL_CUTVIEWS));
        assert_ne!(normalize("AllCutviews"), normalize(ALL_CUTVIEWS));
    }
}
