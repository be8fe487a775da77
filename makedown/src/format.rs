use std::fmt::{self, Write};

/// Prefix every line of a recipe with a tab.
///
/// Line endings are normalized to `\n` first. A trailing newline produces a
/// final empty line, which is indented like the others.
pub fn indent_recipe(recipe: &str) -> String {
    let recipe = recipe.replace("\r\n", "\n");
    let mut out = String::with_capacity(recipe.len() + 8);
    for line in recipe.split('\n') {
        out.push('\t');
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Write the comment that closes every generated Makefile.
pub fn write_footer<W: Write>(out: &mut W, source_name: &str) -> fmt::Result {
    out.write_str("\n# This makefile is generated by makedown from ")?;
    write_quoted(out, source_name)?;
    out.write_char('\n')
}

/// Double-quote a name with Go `%q` escaping.
///
/// Printable characters pass through. The rest use the short escapes
/// (`\a`, `\n`, ...), `\xNN` below U+0080, and `\uNNNN` or `\UNNNNNNNN`
/// above.
fn write_quoted<W: Write>(out: &mut W, name: &str) -> fmt::Result {
    out.write_char('"')?;
    for c in name.chars() {
        match c {
            '"' | '\\' => {
                out.write_char('\\')?;
                out.write_char(c)?;
            }
            c if is_printable(c) => out.write_char(c)?,
            '\u{7}' => out.write_str("\\a")?,
            '\u{8}' => out.write_str("\\b")?,
            '\u{c}' => out.write_str("\\f")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            '\u{b}' => out.write_str("\\v")?,
            c if c < ' ' || c == '\u{7f}' => write!(out, "\\x{:02x}", u32::from(c))?,
            c if u32::from(c) < 0x10000 => write!(out, "\\u{:04x}", u32::from(c))?,
            c => write!(out, "\\U{:08x}", u32::from(c))?,
        }
    }
    out.write_char('"')
}

/// Letters, marks, numbers, punctuation, symbols and the ASCII space.
///
/// Control characters, separators other than U+0020, format characters and
/// private-use characters are not printable. Unassigned code points are
/// treated as printable.
fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    !(c.is_control() || c.is_whitespace() || is_format(c) || is_private_use(c))
}

/// Characters of general category Cf.
fn is_format(c: char) -> bool {
    const FORMAT: &[(u32, u32)] = &[
        (0x00AD, 0x00AD),
        (0x0600, 0x0605),
        (0x061C, 0x061C),
        (0x06DD, 0x06DD),
        (0x070F, 0x070F),
        (0x0890, 0x0891),
        (0x08E2, 0x08E2),
        (0x180E, 0x180E),
        (0x200B, 0x200F),
        (0x202A, 0x202E),
        (0x2060, 0x2064),
        (0x2066, 0x206F),
        (0xFEFF, 0xFEFF),
        (0xFFF9, 0xFFFB),
        (0x110BD, 0x110BD),
        (0x110CD, 0x110CD),
        (0x13430, 0x1343F),
        (0x1BCA0, 0x1BCA3),
        (0x1D173, 0x1D17A),
        (0xE0001, 0xE0001),
        (0xE0020, 0xE007F),
    ];
    let c = u32::from(c);
    FORMAT.iter().any(|&(lo, hi)| (lo..=hi).contains(&c))
}

fn is_private_use(c: char) -> bool {
    matches!(u32::from(c), 0xE000..=0xF8FF | 0xF0000..=0xFFFFD | 0x100000..=0x10FFFD)
}
