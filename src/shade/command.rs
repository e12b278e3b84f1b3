//! Command vocabulary for shade controllers.
//!
//! A controller command is plain ASCII with no framing:
//!
//! ```text
//! <shade id><token><motor type>
//! ```
//!
//! where the token is one of four fixed literals (see [`CommandKind::token`]).
//! Shade ids and motor types come from the key's settings and are
//! concatenated verbatim.

use super::client::ShadeError;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token that raises (opens) a shade.
pub const OPEN_TOKEN: &str = "-up!";
/// Token that lowers (closes) a shade.
pub const CLOSE_TOKEN: &str = "-dn!";
/// Token that stops a moving shade.
pub const STOP_TOKEN: &str = "-sp!";
/// Token that moves a shade to its stored favourite position.
pub const FAVOURITE_TOKEN: &str = "-gp!";

/// The four motor commands a controller understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommandKind {
    Open,
    Close,
    Stop,
    Favourite,
}

impl CommandKind {
    /// Every kind, in a stable order.
    pub const ALL: [CommandKind; 4] = [
        CommandKind::Open,
        CommandKind::Close,
        CommandKind::Stop,
        CommandKind::Favourite,
    ];

    /// The wire token for this kind.  Case-sensitive; must match the
    /// controller exactly.
    pub fn token(self) -> &'static str {
        match self {
            CommandKind::Open => OPEN_TOKEN,
            CommandKind::Close => CLOSE_TOKEN,
            CommandKind::Stop => STOP_TOKEN,
            CommandKind::Favourite => FAVOURITE_TOKEN,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandKind::Open => write!(f, "open"),
            CommandKind::Close => write!(f, "close"),
            CommandKind::Stop => write!(f, "stop"),
            CommandKind::Favourite => write!(f, "favourite"),
        }
    }
}

/// Parse a kind name (case-insensitive; also accepts "up", "down", "dn",
/// "sp", "favorite", "gp").
///
/// Anything else is [`ShadeError::InvalidCommandKind`]; an empty token is
/// never produced.
impl FromStr for CommandKind {
    type Err = ShadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(|c| c.to_lowercase())
            .collect();
        match normalized.as_str() {
            "open" | "up" => Ok(CommandKind::Open),
            "close" | "down" | "dn" => Ok(CommandKind::Close),
            "stop" | "sp" => Ok(CommandKind::Stop),
            "favourite" | "favorite" | "gp" => Ok(CommandKind::Favourite),
            _ => Err(ShadeError::InvalidCommandKind(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for CommandKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(DeError::custom)
    }
}

/// A command ready to be written to a controller.
///
/// Only constructed through [`encode`] (or
/// [`ShadeCommandRequest::encode`]), so the bytes always carry one of the
/// four known tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCommand(String);

impl EncodedCommand {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for EncodedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build `shade_id + token(kind) + motor_type`.
pub fn encode(shade_id: &str, motor_type: &str, kind: CommandKind) -> EncodedCommand {
    let token = kind.token();
    let mut s = String::with_capacity(shade_id.len() + token.len() + motor_type.len());
    s.push_str(shade_id);
    s.push_str(token);
    s.push_str(motor_type);
    EncodedCommand(s)
}

/// Everything needed to drive one shade once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadeCommandRequest {
    /// Controller endpoint as `host:port`.
    pub address: String,
    pub shade_id: String,
    pub motor_type: String,
    pub kind: CommandKind,
}

impl ShadeCommandRequest {
    pub fn encode(&self) -> EncodedCommand {
        encode(&self.shade_id, &self.motor_type, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_match_controller_protocol() {
        assert_eq!(CommandKind::Open.token(), "-up!");
        assert_eq!(CommandKind::Close.token(), "-dn!");
        assert_eq!(CommandKind::Stop.token(), "-sp!");
        assert_eq!(CommandKind::Favourite.token(), "-gp!");
    }

    #[test]
    fn encode_stop_example() {
        assert_eq!(encode("03", "1", CommandKind::Stop).as_str(), "03-sp!1");
    }

    #[test]
    fn encode_concatenates_for_every_kind() {
        for kind in CommandKind::ALL {
            let cmd = encode("12", "bf", kind);
            assert_eq!(cmd.as_str(), format!("12{}bf", kind.token()));
        }
    }

    #[test]
    fn encode_accepts_empty_fields() {
        assert_eq!(encode("", "", CommandKind::Open).as_str(), "-up!");
        assert_eq!(encode("", "1", CommandKind::Close).as_str(), "-dn!1");
        assert_eq!(encode("7", "", CommandKind::Favourite).as_str(), "7-gp!");
    }

    #[test]
    fn encode_passes_fields_through_verbatim() {
        // No escaping or validation of configured tokens.
        let cmd = encode("a b!", "-x-", CommandKind::Stop);
        assert_eq!(cmd.as_bytes(), b"a b!-sp!-x-");
    }

    #[test]
    fn request_encode() {
        let req = ShadeCommandRequest {
            address: "10.0.0.5:8838".into(),
            shade_id: "021".into(),
            motor_type: "04".into(),
            kind: CommandKind::Open,
        };
        assert_eq!(req.encode().to_string(), "021-up!04");
    }

    #[test]
    fn parse_kind_names() {
        assert_eq!("open".parse::<CommandKind>().unwrap(), CommandKind::Open);
        assert_eq!("Close".parse::<CommandKind>().unwrap(), CommandKind::Close);
        assert_eq!(" STOP ".parse::<CommandKind>().unwrap(), CommandKind::Stop);
        assert_eq!("favorite".parse::<CommandKind>().unwrap(), CommandKind::Favourite);
        assert_eq!("dn".parse::<CommandKind>().unwrap(), CommandKind::Close);
    }

    #[test]
    fn parse_unknown_kind_is_rejected() {
        match "tilt".parse::<CommandKind>() {
            Err(ShadeError::InvalidCommandKind(s)) => assert_eq!(s, "tilt"),
            other => panic!("expected InvalidCommandKind, got {:?}", other),
        }
        assert!("".parse::<CommandKind>().is_err());
    }

    #[test]
    fn kind_display_round_trips() {
        for kind in CommandKind::ALL {
            assert_eq!(kind.to_string().parse::<CommandKind>().unwrap(), kind);
        }
    }

    #[test]
    fn kind_deserializes_from_json_string() {
        let kind: CommandKind = serde_json::from_str(r#""favourite""#).unwrap();
        assert_eq!(kind, CommandKind::Favourite);
        assert!(serde_json::from_str::<CommandKind>(r#""sideways""#).is_err());
    }
}
