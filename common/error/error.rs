/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{error::Error, fmt};

/// A coded error. Every code is `<prefix><number>`, unique within its enum.
pub trait TypeDBError {
    fn component(&self) -> &'static str;

    fn code(&self) -> &'static str;

    fn format_description(&self) -> String;

    /// A foreign cause, for errors wrapping something that is not itself coded.
    fn source(&self) -> Option<&(dyn Error + Sync)>;

    fn source_typedb_error(&self) -> Option<&(dyn TypeDBError + Sync)>;

    /// The innermost coded error, or `self` when there is no coded cause.
    fn root_source_typedb_error(&self) -> &(dyn TypeDBError + Sync)
    where
        Self: Sized + Sync,
    {
        let mut error: &(dyn TypeDBError + Sync) = self;
        while let Some(source) = error.source_typedb_error() {
            error = source;
        }
        error
    }
}

impl PartialEq for dyn TypeDBError {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for dyn TypeDBError {}

impl fmt::Debug for dyn TypeDBError + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Prints the error, then one `caused by` line per link of the cause chain.
impl fmt::Display for dyn TypeDBError + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.format_description())?;
        let mut current: &dyn TypeDBError = self;
        loop {
            if let Some(cause) = current.source_typedb_error() {
                write!(f, "\n  caused by [{}] {}", cause.code(), cause.format_description())?;
                current = cause;
            } else {
                if let Some(cause) = current.source() {
                    write!(f, "\n  caused by {}", cause)?;
                }
                return Ok(());
            }
        }
    }
}

/// Declares a coded error enum.
///
/// Each variant lists its number, a description that may interpolate the payload fields, the payload fields, and
/// at most one cause: `( source: T )` for a foreign `std::error::Error`, or `( typedb_source: T )` for another coded
/// error. Duplicate numbers fail compilation.
#[macro_export]
macro_rules! typedb_error {
    ( $vis: vis $name:ident(component = $component: literal, prefix = $prefix: literal) { $(
        $variant: ident (
            $number: literal,
            $description: literal
            $(, $payload_name: ident : $payload_type: ty )*
            $(, ( source : $source: ty ) )?
            $(, ( typedb_source : $typedb_source: ty ) )?
        ),
    )*}) => {
        #[derive(Clone)]
        $vis enum $name {
            $(
                $variant { $(source: $source, )? $(typedb_source: $typedb_source, )? $($payload_name: $payload_type, )* },
            )*
        }

        impl $name {
            const _UNIQUE_NUMBERS: () = {
                #[deny(unreachable_patterns)]
                match 0usize {
                    $(
                        $number => (),
                    )*
                    _ => (),
                }
            };
        }

        impl $crate::TypeDBError for $name {
            fn component(&self) -> &'static str {
                $component
            }

            fn code(&self) -> &'static str {
                match self {
                    $(
                        Self::$variant { .. } => concat!($prefix, stringify!($number)),
                    )*
                }
            }

            #[allow(unused_variables)]
            fn format_description(&self) -> String {
                match self {
                    $(
                        Self::$variant { $( $payload_name, )* .. } => format!($description),
                    )*
                }
            }

            fn source(&self) -> Option<&(dyn ::std::error::Error + Sync + 'static)> {
                #[allow(unreachable_patterns)]
                match self {
                    $(
                        $(Self::$variant { source, .. } => {
                            let source: &$source = source;
                            Some(source as &(dyn ::std::error::Error + Sync))
                        })?
                    )*
                    _ => None,
                }
            }

            fn source_typedb_error(&self) -> Option<&(dyn $crate::TypeDBError + Sync + 'static)> {
                #[allow(unreachable_patterns)]
                match self {
                    $(
                        $(Self::$variant { typedb_source, .. } => {
                            let typedb_source: &$typedb_source = typedb_source;
                            Some(typedb_source as &(dyn $crate::TypeDBError + Sync))
                        })?
                    )*
                    _ => None,
                }
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Debug::fmt(self as &dyn $crate::TypeDBError, f)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(self as &dyn $crate::TypeDBError, f)
            }
        }

        impl ::std::error::Error for $name {}
    };
}
