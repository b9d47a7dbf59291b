//! ID types for the AG-UI protocol.
//!
//! Every identifier on the wire is a plain string, so the newtypes here only
//! exist to keep a `MessageId` from being passed where a `ThreadId` is
//! expected. Any string is accepted when decoding.

use serde::{Deserialize, Serialize};
use std::ops::Deref;
use uuid::Uuid;

/// Defines a string-backed ID newtype.
macro_rules! define_id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new random ID backed by a UUID v4.
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the ID and returns the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<&String> for $name {
            fn from(s: &String) -> Self {
                Self(s.clone())
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_id_type!(
    /// Identity of a conversation thread. Persists across runs.
    ThreadId
);
define_id_type!(
    /// Identity of one agent run within a thread.
    RunId
);
define_id_type!(
    /// Identity of a message, and the join key for streamed text content.
    MessageId
);
define_id_type!(
    /// Identity of a tool invocation, and the join key for streamed arguments.
    ToolCallId
);

impl ToolCallId {
    /// Creates a provider-style tool call ID in the format "call_xxxxxxxx".
    pub fn random_call() -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        Self(format!("call_{}", &uuid[..8]))
    }
}
