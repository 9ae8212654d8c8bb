use std::borrow::Borrow;
use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

macro_rules! identifier {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                $name(name.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                $name(name)
            }
        }

        impl From<&String> for $name {
            fn from(name: &String) -> Self {
                $name(name.clone())
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

identifier! {
    /// Name of an automaton state, and of the grammar non-terminal it becomes.
    State
}

identifier! {
    /// An alphabet symbol, and the grammar terminal it becomes.
    Symbol
}

lazy_static! {
    /// The symbol carried by ε-productions.
    pub static ref EPSILON: Symbol = Symbol::from("ε");
}
