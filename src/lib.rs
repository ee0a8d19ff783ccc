//! # tg-apidoc
//!
//! A Telegram inline bot for searching the Telegram Bot API reference.
//!
//! The bot downloads the Bot API's OpenAPI description once at startup.
//! Every inline query is then matched (case-insensitive substring) against
//! method and type names, and the matches are sent back as MarkdownV2
//! documentation snippets, 50 per page.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────┐   ┌──────────┐
//! │ OpenAPI JSON │──▶│  Parser  │──▶│ Catalog  │
//! │   (fetch)    │   │ (typed)  │   │ (shared) │
//! └──────────────┘   └──────────┘   └────┬─────┘
//!                                        │
//!                     ┌──────────────────┤
//!                     ▼                  ▼
//!                ┌──────────┐      ┌──────────┐
//!                │   CLI    │      │   Bot    │
//!                │ (tgapi)  │      │ (inline) │
//!                └──────────┘      └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! TELEGRAM_BOT_TOKEN=123:abc tgapi serve     # run the bot
//! tgapi search sendmessage                   # query from the terminal
//! tgapi check                                # fetch and validate the document
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`openapi`] | Validating OpenAPI parser |
//! | [`catalog`] | Fetching and holding the description |
//! | [`reference`] | Schema reference links |
//! | [`format`] | Result rendering |
//! | [`search`] | Query matching |
//! | [`paginate`] | Offset-token pagination |
//! | [`bot`] | Telegram handlers |
//! | [`errors`] | Catalog error types |

pub mod bot;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod format;
pub mod models;
pub mod openapi;
pub mod paginate;
pub mod reference;
pub mod search;
