//! printf-style output path templates with a single integer placeholder.
//!
//! The placeholder follows `%[flags][width][.precision][length]conversion` with flags `-+ 0#`,
//! an optional ignored `h`/`l`/`L` length, and conversions `d i u o x X s`.

use std::{
    fmt,
    path::{Path, PathBuf},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Conversion {
    Decimal,
    Octal,
    LowerHex,
    UpperHex,
    Str,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Flags {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    alt: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Placeholder {
    flags: Flags,
    width: usize,
    precision: Option<usize>,
    conversion: Conversion,
}

impl Placeholder {
    /// Parse the part after `%`. Returns `None` for anything that is not an integer conversion.
    fn parse(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<Self> {
        let mut flags = Flags::default();
        loop {
            match chars.peek() {
                Some('-') => flags.left = true,
                Some('+') => flags.plus = true,
                Some(' ') => flags.space = true,
                Some('0') => flags.zero = true,
                Some('#') => flags.alt = true,
                _ => break,
            }
            chars.next();
        }

        let width = digits(chars)?.unwrap_or(0);
        let precision = if chars.next_if_eq(&'.').is_some() {
            Some(digits(chars)?.unwrap_or(0))
        } else {
            None
        };
        while chars.next_if(|c| matches!(c, 'h' | 'l' | 'L')).is_some() {}

        let conversion = match chars.next()? {
            'd' | 'i' | 'u' => Conversion::Decimal,
            'o' => Conversion::Octal,
            'x' => Conversion::LowerHex,
            'X' => Conversion::UpperHex,
            's' => Conversion::Str,
            _ => return None,
        };
        Some(Self {
            flags,
            width,
            precision,
            conversion,
        })
    }

    fn format(&self, n: i64) -> String {
        let Flags {
            left,
            plus,
            space,
            zero,
            alt,
        } = self.flags;

        let body = match self.conversion {
            Conversion::Str => {
                let s = n.to_string();
                match self.precision {
                    Some(p) => s.chars().take(p).collect(),
                    None => s,
                }
            }
            conversion => {
                let mag = n.unsigned_abs();
                let mut digits = match conversion {
                    Conversion::Octal => format!("{mag:o}"),
                    Conversion::LowerHex => format!("{mag:x}"),
                    Conversion::UpperHex => format!("{mag:X}"),
                    _ => mag.to_string(),
                };
                if let Some(p) = self.precision {
                    if digits.len() < p {
                        digits.insert_str(0, &"0".repeat(p - digits.len()));
                    }
                }

                let sign = if n < 0 {
                    "-"
                } else if plus {
                    "+"
                } else if space {
                    " "
                } else {
                    ""
                };
                let prefix = match (alt, conversion) {
                    (true, Conversion::Octal) => "0o",
                    (true, Conversion::LowerHex) => "0x",
                    (true, Conversion::UpperHex) => "0X",
                    _ => "",
                };
                let head = format!("{sign}{prefix}");
                if zero && !left && self.precision.is_none() {
                    let fill = self.width.saturating_sub(head.len() + digits.len());
                    digits.insert_str(0, &"0".repeat(fill));
                }
                head + &digits
            }
        };

        let fill = self.width.saturating_sub(body.chars().count());
        if left {
            body + &" ".repeat(fill)
        } else {
            " ".repeat(fill) + &body
        }
    }
}

// `Ok(None)` when no digits follow; `None` on overflow.
fn digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<Option<usize>> {
    let mut value: Option<usize> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = Some(value.unwrap_or(0).checked_mul(10)?.checked_add(d as usize)?);
        chars.next();
    }
    Some(value)
}

/// A path template holding exactly one integer placeholder. `%%` is a literal `%`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    prefix: String,
    suffix: String,
    placeholder: Placeholder,
}

impl PathTemplate {
    /// Parse `raw`, which must hold exactly one integer placeholder.
    ///
    /// Returns `None` when there is no placeholder, more than one, or any `%` sequence that
    /// cannot format an integer.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut placeholder = None;

        let mut chars = raw.chars().peekable();
        while let Some(c) = chars.next() {
            let out = if placeholder.is_some() {
                &mut suffix
            } else {
                &mut prefix
            };
            if c != '%' {
                out.push(c);
                continue;
            }
            if chars.next_if_eq(&'%').is_some() {
                out.push('%');
                continue;
            }
            if placeholder.is_some() {
                return None;
            }
            placeholder = Some(Placeholder::parse(&mut chars)?);
        }

        Some(Self {
            raw: raw.to_string(),
            prefix,
            suffix,
            placeholder: placeholder?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Substitute `index` into the placeholder.
    pub fn render(&self, index: i64) -> PathBuf {
        let n = self.placeholder.format(index);
        PathBuf::from(format!("{}{n}{}", self.prefix, self.suffix))
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Insert `.%d` between the file stem and the extension (`frame.png` -> `frame.%d.png`).
pub fn insert_placeholder(raw: &str) -> String {
    let path = Path::new(raw);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) => {
            let name = format!("{}.%d.{}", stem.to_string_lossy(), ext.to_string_lossy());
            path.with_file_name(name).to_string_lossy().into_owned()
        }
        _ => format!("{raw}.%d"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_placeholder_renders_index() {
        let t = PathTemplate::parse("f%d.png").unwrap();
        assert_eq!(t.render(7), PathBuf::from("f7.png"));
        assert_eq!(t.render(-3), PathBuf::from("f-3.png"));
        assert_eq!(t.as_str(), "f%d.png");
    }

    #[test]
    fn width_and_zero_padding() {
        let t = PathTemplate::parse("out/%04d.png").unwrap();
        assert_eq!(t.render(42), PathBuf::from("out/0042.png"));
        assert_eq!(t.render(-3), PathBuf::from("out/-003.png"));
        let t = PathTemplate::parse("%3i.png").unwrap();
        assert_eq!(t.render(5), PathBuf::from("  5.png"));
    }

    #[test]
    fn literal_percent_is_preserved() {
        let t = PathTemplate::parse("100%%_%d.png").unwrap();
        assert_eq!(t.render(1), PathBuf::from("100%_1.png"));
    }

    #[test]
    fn parse_fails_without_exactly_one_integer_placeholder() {
        assert!(PathTemplate::parse("frame.png").is_none());
        assert!(PathTemplate::parse("a%d%d.png").is_none());
        assert!(PathTemplate::parse("a%s%x.png").is_none());
        assert!(PathTemplate::parse("trailing%").is_none());
        assert!(PathTemplate::parse("100%%.png").is_none());
    }

    #[test]
    fn placeholder_is_inserted_before_extension() {
        assert_eq!(insert_placeholder("frame.png"), "frame.%d.png");
        assert_eq!(insert_placeholder("dir.v2/out.gif"), "dir.v2/out.%d.gif");
        assert_eq!(insert_placeholder("frames"), "frames.%d");
        assert_eq!(insert_placeholder(".hidden"), ".hidden.%d");
    }

    #[test]
    fn placeholder_insertion_handles_non_ascii_extensions() {
        assert_eq!(insert_placeholder("a.é/"), "a.%d.é");
        assert_eq!(insert_placeholder("dir/x.é"), "dir/x.%d.é");
        assert_eq!(insert_placeholder("ünï.cödé"), "ünï.%d.cödé");
    }

    #[test]
    fn integer_conversions_and_flags() {
        let r = |t: &str, n: i64| {
            PathTemplate::parse(t)
                .unwrap_or_else(|| panic!("{t} should parse"))
                .render(n)
                .to_string_lossy()
                .into_owned()
        };
        assert_eq!(r("%u", 7), "7");
        assert_eq!(r("%x", 255), "ff");
        assert_eq!(r("%X", 255), "FF");
        assert_eq!(r("%o", 8), "10");
        assert_eq!(r("%#x", 255), "0xff");
        assert_eq!(r("%#o", 8), "0o10");
        assert_eq!(r("%x", -255), "-ff");
        assert_eq!(r("%+d", 5), "+5");
        assert_eq!(r("% d", 5), " 5");
        assert_eq!(r("%-3d|", 5), "5  |");
        assert_eq!(r("%.3d", 5), "005");
        assert_eq!(r("%5.3d", -5), " -005");
        assert_eq!(r("%s", 42), "42");
        assert_eq!(r("%4s", 42), "  42");
        assert_eq!(r("%ld", 9), "9");
    }

    #[test]
    fn non_integer_conversions_are_rejected() {
        for t in ["%c.png", "%f.png", "%e.png", "%q.png", "%-.png"] {
            assert!(PathTemplate::parse(t).is_none(), "{t}");
        }
    }
}
