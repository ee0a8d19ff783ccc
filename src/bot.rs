//! Telegram frontend: `/start` and inline query handlers.
//!
//! The handlers only translate between teloxide types and the search
//! core; matching, formatting and pagination happen in [`crate::search`].

use teloxide::prelude::*;
use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, InlineQuery, InlineQueryResult,
    InlineQueryResultArticle, InlineQueryResultsButton, InlineQueryResultsButtonKind,
    InputMessageContent, InputMessageContentText, LinkPreviewOptions,
    ParseMode as TelegramParseMode,
};
use teloxide::utils::command::BotCommands;
use tracing::{error, info};

use crate::catalog::Catalog;
use crate::config::BotConfig;
use crate::models::{ParseMode, SearchResult};
use crate::search;

pub const WELCOME_TEXT: &str =
    "Hello! I am an inline bot for looking up the Telegram Bot API.\n\
     Type my username followed by a method or type name in any chat.";

/// Query pre-filled by the button under the welcome message.
pub const SAMPLE_QUERY: &str = "/sendmessage";

pub const HELP_BUTTON_TEXT: &str = "Help";

/// Start parameter sent when a user taps the "Help" button.
pub const HELP_START_PARAMETER: &str = "iq";

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    /// Accepts an optional deep-link payload, e.g. `/start iq`.
    #[command(description = "show the welcome message.")]
    Start(String),
}

/// Per-answer settings shared with every inline query handler.
#[derive(Debug, Clone)]
pub struct AnswerSettings {
    pub cache_time: u32,
}

impl From<&BotConfig> for AnswerSettings {
    fn from(config: &BotConfig) -> Self {
        Self {
            cache_time: config.cache_time,
        }
    }
}

/// Run the dispatcher until Ctrl-C.
pub async fn run_bot(bot: Bot, catalog: Catalog, config: &BotConfig) -> anyhow::Result<()> {
    bot.delete_webhook().drop_pending_updates(true).await?;

    let me = bot.get_me().await?;
    info!("Bot authenticated as: @{}", me.username());

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_inline_query().endpoint(handle_inline_query));

    info!("Starting dispatcher");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![catalog, AnswerSettings::from(config)])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot stopped");
    Ok(())
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> ResponseResult<()> {
    match cmd {
        Command::Start(payload) => {
            if let Some(user) = msg.from.as_ref() {
                info!(
                    payload = %payload,
                    "Handle /start from {}({}|@{})",
                    user.first_name,
                    user.id.0,
                    user.username.as_deref().unwrap_or("-")
                );
            }
            bot.send_message(msg.chat.id, WELCOME_TEXT)
                .reply_markup(start_keyboard())
                .await?;
        }
    }
    Ok(())
}

async fn handle_inline_query(
    bot: Bot,
    query: InlineQuery,
    catalog: Catalog,
    settings: AnswerSettings,
) -> ResponseResult<()> {
    let api = catalog.snapshot();
    let page = search::answer(&query.query, &query.offset, &api);

    info!(
        offset = %query.offset,
        results = page.results.len(),
        "Handle iq: {:?} from {}({}|@{})",
        query.query,
        query.from.first_name,
        query.from.id.0,
        query.from.username.as_deref().unwrap_or("-")
    );

    let results: Vec<InlineQueryResult> =
        page.results.into_iter().map(to_inline_result).collect();

    let mut req = bot.answer_inline_query(&query.id, results);
    req.cache_time = Some(settings.cache_time);
    req.next_offset = Some(page.next_offset);
    req.button = Some(help_button());

    if let Err(e) = req.await {
        error!("Failed to answer inline query {}: {}", query.id, e);
    }

    Ok(())
}

pub fn start_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[InlineKeyboardButton::switch_inline_query_current_chat(
        format!("Search: '{}'", SAMPLE_QUERY),
        SAMPLE_QUERY,
    )]])
}

pub fn help_button() -> InlineQueryResultsButton {
    InlineQueryResultsButton {
        text: HELP_BUTTON_TEXT.to_string(),
        kind: InlineQueryResultsButtonKind::StartParameter(HELP_START_PARAMETER.to_string()),
    }
}

/// Convert a search result into a Telegram article.
pub fn to_inline_result(result: SearchResult) -> InlineQueryResult {
    let mut content = InputMessageContentText::new(result.body);
    content.parse_mode = Some(match result.parse_mode {
        ParseMode::MarkdownV2 => TelegramParseMode::MarkdownV2,
    });
    if result.disable_link_preview {
        content.link_preview_options = Some(LinkPreviewOptions {
            is_disabled: true,
            url: None,
            prefer_small_media: false,
            prefer_large_media: false,
            show_above_text: false,
        });
    }

    let mut article = InlineQueryResultArticle::new(
        result.id,
        result.title,
        InputMessageContent::Text(content),
    );
    article.description = result.description;

    InlineQueryResult::Article(article)
}
