use embedded_graphics::geometry::Point;

pub const GLYPH_HEIGHT: usize = 5;

/// One character of the font. Each row stores its columns in the low `width` bits, leftmost
/// column in the highest of those bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub width: u8,
    pub rows: [u8; GLYPH_HEIGHT],
}

impl Glyph {
    const fn new(rows: [u8; GLYPH_HEIGHT]) -> Self {
        Self { width: 3, rows }
    }

    const fn narrow(rows: [u8; GLYPH_HEIGHT]) -> Self {
        Self { width: 1, rows }
    }

    pub fn is_set(&self, col: u8, row: usize) -> bool {
        col < self.width
            && row < GLYPH_HEIGHT
            && (self.rows[row] >> (self.width - 1 - col)) & 1 == 1
    }

    /// Cursor advance, including the spacing that follows the glyph.
    pub fn advance(&self) -> i32 {
        self.width as i32 + super::LETTER_SPACING
    }

    /// Positions of the set bits when the glyph's top left corner is at `origin`.
    pub fn points(&self, origin: Point) -> impl Iterator<Item = Point> + '_ {
        (0..GLYPH_HEIGHT).flat_map(move |row| {
            (0..self.width)
                .filter(move |col| self.is_set(*col, row))
                .map(move |col| origin + Point::new(col as i32, row as i32))
        })
    }
}

const DIGITS: [Glyph; 10] = [
    Glyph::new([0b111, 0b101, 0b101, 0b101, 0b111]),
    Glyph::new([0b110, 0b010, 0b010, 0b010, 0b111]),
    Glyph::new([0b111, 0b001, 0b111, 0b100, 0b111]),
    Glyph::new([0b111, 0b001, 0b111, 0b001, 0b111]),
    Glyph::new([0b101, 0b101, 0b111, 0b001, 0b001]),
    Glyph::new([0b111, 0b100, 0b111, 0b001, 0b111]),
    Glyph::new([0b111, 0b100, 0b111, 0b101, 0b111]),
    Glyph::new([0b111, 0b001, 0b001, 0b001, 0b001]),
    Glyph::new([0b111, 0b101, 0b111, 0b101, 0b111]),
    Glyph::new([0b111, 0b101, 0b111, 0b001, 0b111]),
];

const LETTERS: [Glyph; 26] = [
    Glyph::new([0b010, 0b101, 0b111, 0b101, 0b101]), // A
    Glyph::new([0b110, 0b101, 0b110, 0b101, 0b110]),
    Glyph::new([0b011, 0b100, 0b100, 0b100, 0b011]),
    Glyph::new([0b110, 0b101, 0b101, 0b101, 0b110]),
    Glyph::new([0b111, 0b100, 0b110, 0b100, 0b111]),
    Glyph::new([0b111, 0b100, 0b110, 0b100, 0b100]),
    Glyph::new([0b011, 0b100, 0b101, 0b101, 0b011]),
    Glyph::new([0b101, 0b101, 0b111, 0b101, 0b101]),
    Glyph::new([0b111, 0b010, 0b010, 0b010, 0b111]),
    Glyph::new([0b001, 0b001, 0b001, 0b101, 0b010]),
    Glyph::new([0b101, 0b101, 0b110, 0b101, 0b101]), // K
    Glyph::new([0b100, 0b100, 0b100, 0b100, 0b111]),
    Glyph::new([0b101, 0b111, 0b101, 0b101, 0b101]),
    Glyph::new([0b101, 0b111, 0b111, 0b101, 0b101]),
    Glyph::new([0b010, 0b101, 0b101, 0b101, 0b010]),
    Glyph::new([0b110, 0b101, 0b110, 0b100, 0b100]),
    Glyph::new([0b010, 0b101, 0b101, 0b111, 0b011]),
    Glyph::new([0b110, 0b101, 0b110, 0b101, 0b101]),
    Glyph::new([0b011, 0b100, 0b010, 0b001, 0b110]),
    Glyph::new([0b111, 0b010, 0b010, 0b010, 0b010]),
    Glyph::new([0b101, 0b101, 0b101, 0b101, 0b010]), // U
    Glyph::new([0b101, 0b101, 0b101, 0b010, 0b010]),
    Glyph::new([0b101, 0b101, 0b101, 0b111, 0b101]),
    Glyph::new([0b101, 0b101, 0b010, 0b101, 0b101]),
    Glyph::new([0b101, 0b101, 0b010, 0b010, 0b010]),
    Glyph::new([0b111, 0b001, 0b010, 0b100, 0b111]),
];

const SPACE: Glyph = Glyph::new([0; GLYPH_HEIGHT]);
const HYPHEN: Glyph = Glyph::new([0b000, 0b000, 0b111, 0b000, 0b000]);
const SLASH: Glyph = Glyph::new([0b001, 0b001, 0b010, 0b100, 0b100]);
const PERIOD: Glyph = Glyph::narrow([0, 0, 0, 0, 1]);
const COLON: Glyph = Glyph::narrow([0, 1, 0, 1, 0]);

/// Looks up the glyph for `c`, ignoring case. `None` means the character is unsupported.
pub fn glyph(c: char) -> Option<&'static Glyph> {
    match c.to_ascii_uppercase() {
        d @ '0'..='9' => Some(&DIGITS[d as usize - '0' as usize]),
        l @ 'A'..='Z' => Some(&LETTERS[l as usize - 'A' as usize]),
        ' ' => Some(&SPACE),
        '-' => Some(&HYPHEN),
        '/' => Some(&SLASH),
        '.' => Some(&PERIOD),
        ':' => Some(&COLON),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_supported_set() {
        for c in ('0'..='9').chain('A'..='Z').chain(" -./:".chars()) {
            assert!(glyph(c).is_some(), "missing glyph for {c:?}");
        }
        for c in ['?', '#', '_', '\u{e9}', '\n'] {
            assert!(glyph(c).is_none(), "unexpected glyph for {c:?}");
        }
    }

    #[test]
    fn test_rows_fit_width() {
        for c in ('0'..='9').chain('A'..='Z').chain(" -./:".chars()) {
            let g = glyph(c).unwrap();
            for row in g.rows {
                assert_eq!(row >> g.width, 0, "{c:?} has bits outside its width");
            }
        }
    }

    #[test]
    fn test_narrow_glyphs() {
        assert_eq!(glyph('.').unwrap().width, 1);
        assert_eq!(glyph(':').unwrap().width, 1);
        assert_eq!(glyph('W').unwrap().width, 3);
    }

    #[test]
    fn test_points() {
        let one = glyph('1').unwrap();
        let drawn: Vec<Point> = one.points(Point::new(10, 20)).take(3).collect();
        assert_eq!(
            drawn,
            vec![Point::new(10, 20), Point::new(11, 20), Point::new(11, 21)]
        );
        assert_eq!(one.points(Point::zero()).count(), 8);
    }
}
