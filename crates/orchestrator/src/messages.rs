//! Texts sent to recipients.

use database::{DeliverySlot, NewEducation};
use database::validation::weekday_name;

/// Help text shown when user asks for help.
pub const HELP_TEXT: &str = r#"I send the homework from the school journal for the next school day.

Commands:
• /start - Start over (clears your token and delivery times)
• /token <token> - Link the journal account behind this token
• /time <weekday> <HH:MM> - Set the delivery time for a weekday (mon..sun)
• /time <weekday> 25:00 - Turn deliveries off for that weekday
• /schedule - Show your delivery times
• /homework - Send the homework right now

Every weekday starts with a 16:00 delivery."#;

pub const WELCOME: &str = "Hi! I deliver homework from the school journal. To finish setup, send me the token of your journal account: /token <token>";

pub const NOT_INITIALIZED: &str = "Please send /start first.";

pub const SETUP_INCOMPLETE: &str = "Finish setup first: send the token of your journal account with /token <token>.";

pub const TOKEN_REJECTED: &str = "The journal did not accept this token. Check it and try again.";

pub const JOURNAL_UNAVAILABLE: &str = "The school journal is not responding right now. Please try again later.";

pub const GENERIC_FAILURE: &str = "Something went wrong on my side. Please try again later.";

pub const UNKNOWN_COMMAND: &str = "Unknown command. Send /help for the list of commands.";

pub const NO_EDUCATIONS: &str = "No children are linked to your journal account, so there is no homework to send.";

pub const SETUP_FINISHED: &str = "Setup is finished. From now on you will get the homework here at the times you picked. Send /help any time to see the commands.";

pub const NO_HOMEWORK: &str = "No homework found for the next school day.";

/// Reply to an accepted token.
pub fn credential_accepted(educations: &[NewEducation]) -> String {
    if educations.is_empty() {
        return "Token saved, but no children are linked to it.".to_string();
    }

    let children: Vec<String> = educations
        .iter()
        .map(|e| {
            format!(
                "• {} {} ({}, {})",
                e.last_name, e.first_name, e.school, e.class_name
            )
        })
        .collect();

    format!(
        "Token saved. Linked:\n{}\n\nPick delivery times with /time <weekday> <HH:MM>, e.g. /time mon 16:00. Use 25:00 to turn a day off.",
        children.join("\n")
    )
}

/// Reply to a delivery time change on a weekday other than Sunday.
pub fn slot_updated(weekday: u8, time: &str) -> String {
    format!(
        "Homework for {} will arrive at {}.",
        weekday_name(weekday).unwrap_or("?"),
        time
    )
}

/// Reply to turning a weekday off.
pub fn slot_disabled(weekday: u8) -> String {
    format!(
        "No more deliveries on {}.",
        weekday_name(weekday).unwrap_or("?")
    )
}

/// Listing of a recipient's delivery times, disabled days marked off.
pub fn schedule_listing(slots: &[DeliverySlot]) -> String {
    let lines: Vec<String> = (0..7u8)
        .map(|weekday| {
            let time = slots
                .iter()
                .find(|slot| slot.weekday == i64::from(weekday))
                .map(|slot| slot.time.as_str())
                .unwrap_or("off");
            format!("{} {}", weekday_name(weekday).unwrap_or("?"), time)
        })
        .collect();

    format!("Delivery times:\n{}", lines.join("\n"))
}

/// Notice for an education whose delivery failed.
pub fn education_failed(first_name: &str, last_name: &str) -> String {
    format!(
        "Could not get the homework for {} {}. I will try again at the next delivery.",
        last_name, first_name
    )
}
