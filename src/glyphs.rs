//! 5x7 bitmap glyphs for digits and capital letters.

pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 7;
/// Advance between glyphs, in glyph cells.
pub const GLYPH_ADVANCE: usize = GLYPH_WIDTH + 1;

type Rows = [&'static str; GLYPH_HEIGHT];

const DIGITS: [Rows; 10] = [
    [" ### ", "#   #", "#  ##", "# # #", "##  #", "#   #", " ### "],
    ["  #  ", " ##  ", "  #  ", "  #  ", "  #  ", "  #  ", " ### "],
    [" ### ", "#   #", "    #", "   # ", "  #  ", " #   ", "#####"],
    ["#####", "   # ", "  #  ", "   # ", "    #", "#   #", " ### "],
    ["   # ", "  ## ", " # # ", "#  # ", "#####", "   # ", "   # "],
    ["#####", "#    ", "#### ", "    #", "    #", "#   #", " ### "],
    ["  ## ", " #   ", "#    ", "#### ", "#   #", "#   #", " ### "],
    ["#####", "    #", "   # ", "  #  ", " #   ", " #   ", " #   "],
    [" ### ", "#   #", "#   #", " ### ", "#   #", "#   #", " ### "],
    [" ### ", "#   #", "#   #", " ####", "    #", "   # ", " ##  "],
];

const LETTERS: [Rows; 26] = [
    [" ### ", "#   #", "#   #", "#####", "#   #", "#   #", "#   #"],
    ["#### ", "#   #", "#   #", "#### ", "#   #", "#   #", "#### "],
    [" ### ", "#   #", "#    ", "#    ", "#    ", "#   #", " ### "],
    ["#### ", "#   #", "#   #", "#   #", "#   #", "#   #", "#### "],
    ["#####", "#    ", "#    ", "#### ", "#    ", "#    ", "#####"],
    ["#####", "#    ", "#    ", "#### ", "#    ", "#    ", "#    "],
    [" ### ", "#   #", "#    ", "# ###", "#   #", "#   #", " ####"],
    ["#   #", "#   #", "#   #", "#####", "#   #", "#   #", "#   #"],
    [" ### ", "  #  ", "  #  ", "  #  ", "  #  ", "  #  ", " ### "],
    ["  ###", "   # ", "   # ", "   # ", "   # ", "#  # ", " ##  "],
    ["#   #", "#  # ", "# #  ", "##   ", "# #  ", "#  # ", "#   #"],
    ["#    ", "#    ", "#    ", "#    ", "#    ", "#    ", "#####"],
    ["#   #", "## ##", "# # #", "# # #", "#   #", "#   #", "#   #"],
    ["#   #", "#   #", "##  #", "# # #", "#  ##", "#   #", "#   #"],
    [" ### ", "#   #", "#   #", "#   #", "#   #", "#   #", " ### "],
    ["#### ", "#   #", "#   #", "#### ", "#    ", "#    ", "#    "],
    [" ### ", "#   #", "#   #", "#   #", "# # #", "#  # ", " ## #"],
    ["#### ", "#   #", "#   #", "#### ", "# #  ", "#  # ", "#   #"],
    [" ####", "#    ", "#    ", " ### ", "    #", "    #", "#### "],
    ["#####", "  #  ", "  #  ", "  #  ", "  #  ", "  #  ", "  #  "],
    ["#   #", "#   #", "#   #", "#   #", "#   #", "#   #", " ### "],
    ["#   #", "#   #", "#   #", "#   #", "#   #", " # # ", "  #  "],
    ["#   #", "#   #", "#   #", "# # #", "# # #", "# # #", " # # "],
    ["#   #", "#   #", " # # ", "  #  ", " # # ", "#   #", "#   #"],
    ["#   #", "#   #", " # # ", "  #  ", "  #  ", "  #  ", "  #  "],
    ["#####", "    #", "   # ", "  #  ", " #   ", "#    ", "#####"],
];

fn rows(c: char) -> Option<&'static Rows> {
    match c {
        '0'..='9' => DIGITS.get(c as usize - '0' as usize),
        'A'..='Z' => LETTERS.get(c as usize - 'A' as usize),
        'a'..='z' => LETTERS.get(c as usize - 'a' as usize),
        _ => None,
    }
}

/// Lit cells of a glyph as `(column, row)`, row 0 at the top. Unknown
/// characters, including spaces, have no cells.
pub fn cells(c: char) -> impl Iterator<Item = (usize, usize)> {
    rows(c).into_iter().flat_map(|rows| {
        rows.iter().enumerate().flat_map(|(row, line)| {
            line.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'#')
                .map(move |(col, _)| (col, row))
        })
    })
}

/// Width of a string in glyph cells, without trailing spacing.
pub fn text_width(text: &str) -> usize {
    let n = text.chars().count();
    if n == 0 { 0 } else { n * GLYPH_ADVANCE - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_row_is_five_cells_wide() {
        for glyph in DIGITS.iter().chain(LETTERS.iter()) {
            for row in glyph {
                assert_eq!(row.len(), GLYPH_WIDTH, "{row:?}");
            }
        }
    }

    #[test]
    fn nicknames_are_fully_covered() {
        for c in "49ERS WASHINGTON BUCCANEERS".chars().filter(|c| *c != ' ') {
            assert!(cells(c).count() > 0, "{c}");
        }
        assert_eq!(cells(' ').count(), 0);
        assert_eq!(text_width("10"), 11);
    }
}
