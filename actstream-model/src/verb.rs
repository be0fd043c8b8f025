use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The action an activity describes.
///
/// Well-known verbs are modeled as variants; anything else is kept as
/// [`Verb::Other`] with its token lowercased. Parsing is case-insensitive and
/// every verb displays as its canonical lowercase token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Verb {
    Accept,
    Add,
    Cancel,
    Checkin,
    Delete,
    Favorite,
    Follow,
    Give,
    Ignore,
    Invite,
    Join,
    Leave,
    Like,
    MakeFriend,
    Play,
    Post,
    Receive,
    Reject,
    Remove,
    RemoveFriend,
    RequestFriend,
    RsvpMaybe,
    RsvpNo,
    RsvpYes,
    Save,
    Share,
    StartFollowing,
    StopFollowing,
    Tag,
    Unfavorite,
    Unlike,
    Unsave,
    Update,
    Other(String),
}

impl Verb {
    /// Returns the canonical lowercase token.
    pub fn as_token(&self) -> &str {
        match self {
            Verb::Accept => "accept",
            Verb::Add => "add",
            Verb::Cancel => "cancel",
            Verb::Checkin => "checkin",
            Verb::Delete => "delete",
            Verb::Favorite => "favorite",
            Verb::Follow => "follow",
            Verb::Give => "give",
            Verb::Ignore => "ignore",
            Verb::Invite => "invite",
            Verb::Join => "join",
            Verb::Leave => "leave",
            Verb::Like => "like",
            Verb::MakeFriend => "make-friend",
            Verb::Play => "play",
            Verb::Post => "post",
            Verb::Receive => "receive",
            Verb::Reject => "reject",
            Verb::Remove => "remove",
            Verb::RemoveFriend => "remove-friend",
            Verb::RequestFriend => "request-friend",
            Verb::RsvpMaybe => "rsvp-maybe",
            Verb::RsvpNo => "rsvp-no",
            Verb::RsvpYes => "rsvp-yes",
            Verb::Save => "save",
            Verb::Share => "share",
            Verb::StartFollowing => "start-following",
            Verb::StopFollowing => "stop-following",
            Verb::Tag => "tag",
            Verb::Unfavorite => "unfavorite",
            Verb::Unlike => "unlike",
            Verb::Unsave => "unsave",
            Verb::Update => "update",
            Verb::Other(token) => token,
        }
    }

    /// Returns true for verbs outside the well-known set.
    #[must_use]
    pub fn is_extension(&self) -> bool {
        matches!(self, Verb::Other(_))
    }

    fn from_lowercase(token: String) -> Self {
        match token.as_str() {
            "accept" => Verb::Accept,
            "add" => Verb::Add,
            "cancel" => Verb::Cancel,
            "checkin" => Verb::Checkin,
            "delete" => Verb::Delete,
            "favorite" => Verb::Favorite,
            "follow" => Verb::Follow,
            "give" => Verb::Give,
            "ignore" => Verb::Ignore,
            "invite" => Verb::Invite,
            "join" => Verb::Join,
            "leave" => Verb::Leave,
            "like" => Verb::Like,
            "make-friend" => Verb::MakeFriend,
            "play" => Verb::Play,
            "post" => Verb::Post,
            "receive" => Verb::Receive,
            "reject" => Verb::Reject,
            "remove" => Verb::Remove,
            "remove-friend" => Verb::RemoveFriend,
            "request-friend" => Verb::RequestFriend,
            "rsvp-maybe" => Verb::RsvpMaybe,
            "rsvp-no" => Verb::RsvpNo,
            "rsvp-yes" => Verb::RsvpYes,
            "save" => Verb::Save,
            "share" => Verb::Share,
            "start-following" => Verb::StartFollowing,
            "stop-following" => Verb::StopFollowing,
            "tag" => Verb::Tag,
            "unfavorite" => Verb::Unfavorite,
            "unlike" => Verb::Unlike,
            "unsave" => Verb::Unsave,
            "update" => Verb::Update,
            _ => Verb::Other(token),
        }
    }
}

impl FromStr for Verb {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() || token.chars().any(char::is_whitespace) {
            return Err(crate::Error::InvalidVerb(s.to_string()));
        }
        Ok(Self::from_lowercase(token.to_ascii_lowercase()))
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl Serialize for Verb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_token())
    }
}

impl<'de> Deserialize<'de> for Verb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}
