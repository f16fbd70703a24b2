/// Declares a fieldless enum stored and transported as text.
///
/// Parsing is case-insensitive; the canonical spelling is used for serde and `Display`.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::Error;

            fn from_str(value: &str) -> crate::error::Result<Self> {
                let value = value.trim();
                $(
                    if value.eq_ignore_ascii_case($text) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(crate::error::Error::ParsingError(format!(
                    "\"{}\" is not a valid {}",
                    value,
                    stringify!($name)
                )))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

mod campaign;
mod communication;
mod donation;
mod donor;
mod donor_name;
mod email_address;
mod org_settings;
mod phone_number;
mod validation;

pub use campaign::*;
pub use communication::*;
pub use donation::*;
pub use donor::*;
pub use donor_name::*;
pub use email_address::*;
pub use org_settings::*;
pub use phone_number::*;
pub use validation::*;
