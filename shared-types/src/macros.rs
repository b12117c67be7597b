/// Implements `as_str`, `Display` and a lenient `FromStr` for a unit-variant enum whose
/// wire form is kebab-case. Parsing ignores case and accepts `_` or spaces for `-`.
macro_rules! string_enum {
    ($ty:ident, $field:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::error::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
                match normalized.as_str() {
                    $($text => Ok($ty::$variant),)+
                    _ => Err($crate::error::UnknownVariant {
                        field: $field,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}
