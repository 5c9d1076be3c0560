//! Pure payload builders: (message, robot config) → platform wire JSON.
//!
//! Builders perform no I/O and never mutate their inputs. Every payload
//! carries its discriminator field (`msg_type` for the Lark family,
//! `msgtype` for DingTalk); signing is a post-processing step applied by
//! the senders, not part of the builders.

pub mod card;
pub mod ding;
pub mod lark;
