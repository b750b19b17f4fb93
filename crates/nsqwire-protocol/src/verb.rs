//! Protocol verbs.

use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;

/// A command verb, as written at the start of the header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Client metadata and feature negotiation.
    Identify,
    /// Authentication secret.
    Auth,
    /// Announce a topic/channel producer.
    Register,
    /// Withdraw a topic/channel producer.
    Unregister,
    /// Keep-alive for registered topics.
    Ping,
    /// No-op, used to answer heartbeats.
    Nop,
    /// Start a close cycle.
    StartClose,
    /// Flow control: messages the client is willing to receive.
    Ready,
    /// Message processed.
    Finish,
    /// Message should be redelivered.
    Requeue,
    /// Reset a message timeout.
    Touch,
    /// Publish one message.
    Publish,
    /// Publish one message with a trace id.
    PublishTrace,
    /// Publish one message with an extension block.
    PublishExt,
    /// Publish many messages.
    MultiPublish,
    /// Publish many messages with trace ids.
    MultiPublishTrace,
    /// Publish many messages with extension blocks.
    MultiPublishExt,
    /// Subscribe to a channel.
    Subscribe,
    /// Subscribe with tracing and an optional start offset.
    SubscribeAdvanced,
    /// Ordered subscription on one partition.
    SubscribeOrdered,
    /// Create a topic partition.
    CreateTopic,
}

impl Verb {
    /// Every verb, in wire table order.
    pub const ALL: [Verb; 21] = [
        Verb::Identify,
        Verb::Auth,
        Verb::Register,
        Verb::Unregister,
        Verb::Ping,
        Verb::Nop,
        Verb::StartClose,
        Verb::Ready,
        Verb::Finish,
        Verb::Requeue,
        Verb::Touch,
        Verb::Publish,
        Verb::PublishTrace,
        Verb::PublishExt,
        Verb::MultiPublish,
        Verb::MultiPublishTrace,
        Verb::MultiPublishExt,
        Verb::Subscribe,
        Verb::SubscribeAdvanced,
        Verb::SubscribeOrdered,
        Verb::CreateTopic,
    ];

    /// Wire text of the verb.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identify => "IDENTIFY",
            Self::Auth => "AUTH",
            Self::Register => "REGISTER",
            Self::Unregister => "UNREGISTER",
            Self::Ping => "PING",
            Self::Nop => "NOP",
            Self::StartClose => "CLS",
            Self::Ready => "RDY",
            Self::Finish => "FIN",
            Self::Requeue => "REQ",
            Self::Touch => "TOUCH",
            Self::Publish => "PUB",
            Self::PublishTrace => "PUB_TRACE",
            Self::PublishExt => "PUB_EXT",
            Self::MultiPublish => "MPUB",
            Self::MultiPublishTrace => "MPUB_TRACE",
            Self::MultiPublishExt => "MPUB_EXT",
            Self::Subscribe => "SUB",
            Self::SubscribeAdvanced => "SUB_ADVANCED",
            Self::SubscribeOrdered => "SUB_ORDERED",
            Self::CreateTopic => "INTERNAL_CREATE_TOPIC",
        }
    }

    /// Whether commands with this verb carry a length-prefixed body.
    pub const fn carries_body(self) -> bool {
        matches!(
            self,
            Self::Identify
                | Self::Auth
                | Self::Publish
                | Self::PublishTrace
                | Self::PublishExt
                | Self::MultiPublish
                | Self::MultiPublishTrace
                | Self::MultiPublishExt
        )
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|verb| verb.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownVerb(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_verb() {
        for verb in Verb::ALL {
            assert_eq!(verb.as_str().parse::<Verb>().unwrap(), verb);
        }
    }

    #[test]
    fn unknown_verb_rejected() {
        assert!(matches!(
            "PUBLISH".parse::<Verb>(),
            Err(ProtocolError::UnknownVerb(v)) if v == "PUBLISH"
        ));
    }

    #[test]
    fn body_bearing_verbs() {
        let with_body: Vec<_> = Verb::ALL
            .into_iter()
            .filter(|v| v.carries_body())
            .map(Verb::as_str)
            .collect();
        assert_eq!(
            with_body,
            [
                "IDENTIFY",
                "AUTH",
                "PUB",
                "PUB_TRACE",
                "PUB_EXT",
                "MPUB",
                "MPUB_TRACE",
                "MPUB_EXT"
            ]
        );
    }

    #[test]
    fn ready_uses_short_wire_name() {
        assert_eq!(Verb::Ready.to_string(), "RDY");
    }
}
