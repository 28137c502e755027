//! Conversation Context Builder
//!
//! Pure functions that turn a stored profile snapshot and prior turns into
//! the grounded request sent to the generation endpoint:
//! - system instruction rendering (profile fields + safety disclaimer)
//! - age derivation from a DD/MM/YYYY date of birth
//! - storage turns to generation role/parts mapping
//!
//! Everything here is deterministic: the same snapshot always renders the
//! same instruction.

use chrono::{Datelike, NaiveDate};

use crate::generation::Content;
use crate::models::profile::UserProfile;
use crate::models::turn::ConversationTurn;

/// Safety disclaimer appended to every instruction, personalized or not.
pub const DISCLAIMER: &str = "You are not a doctor. You must always remind the user to \
consult with a real healthcare professional for any medical advice or diagnosis.";

/// Persona line shared by both instruction variants.
const PERSONA: &str = "You are a helpful and friendly AI Health Assistant.";

/// Whole years elapsed between a DD/MM/YYYY date of birth and `today`.
///
/// Decrements by one when today's (month, day) precedes the birth
/// (month, day). Returns None when the string does not parse.
pub fn age_on(date_of_birth: &str, today: NaiveDate) -> Option<i32> {
    let birth = NaiveDate::parse_from_str(date_of_birth, "%d/%m/%Y").ok()?;
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    Some(years)
}

/// Human-readable age phrase, degrading to a placeholder instead of failing.
fn describe_age(date_of_birth: Option<&str>, today: NaiveDate) -> String {
    match date_of_birth {
        None => "an unknown age".to_string(),
        Some(dob) => match age_on(dob, today) {
            Some(age) => format!("{} years old", age),
            None => "an unknown age (invalid date format)".to_string(),
        },
    }
}

fn or_unknown(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "unknown",
    }
}

fn yes_no(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    }
}

fn number_or_unknown(value: Option<f64>) -> String {
    match value {
        Some(n) => format!("{}", n),
        None => "unknown".to_string(),
    }
}

/// Render the system instruction for one chat exchange.
///
/// With no stored profile the instruction stays generic and invites the
/// user to create one. With a profile, every available field is embedded
/// and missing fields render as explicit placeholders. The disclaimer is
/// unconditional.
pub fn render_instruction(profile: Option<&UserProfile>, today: NaiveDate) -> String {
    let Some(profile) = profile else {
        return format!(
            "{}\nYou should encourage the user to create a profile to get personalized advice.\n\n{}",
            PERSONA, DISCLAIMER
        );
    };

    let name = match profile.name.as_deref() {
        Some(n) if !n.is_empty() => n,
        _ => "the user",
    };
    let goals = match profile.health_goals.as_deref() {
        Some(g) if !g.is_empty() => g,
        _ => "general wellness",
    };
    let age = describe_age(profile.date_of_birth.as_deref(), today);

    format!(
        "{persona}\n\
        You are currently speaking with {name}, who is {age}. Their main health goal is: '{goals}'.\n\
        Use this information to personalize your conversation. For example, you can address them by their name.\n\
        \n\
        Known profile details:\n\
        - Gender: {gender}\n\
        - Blood Group: {blood_group}\n\
        - Allergies: {allergies}\n\
        - Medical Conditions: {conditions}\n\
        - Medications: {medications}\n\
        - Has Previous Falls: {falls}\n\
        - Fall Description: {fall_description}\n\
        - Sleep Hours: {sleep_hours}\n\
        - Mobility Level: {mobility}\n\
        - Activity Level: {activity}\n\
        - Living Alone: {living_alone}\n\
        - Height: {height} cm\n\
        - Weight: {weight} kg\n\
        - Preferred Language: {language}\n\
        \n\
        {disclaimer}",
        persona = PERSONA,
        name = name,
        age = age,
        goals = goals,
        gender = or_unknown(profile.gender.as_deref()),
        blood_group = or_unknown(profile.blood_group.as_deref()),
        allergies = or_unknown(profile.allergies.as_deref()),
        conditions = or_unknown(profile.medical_conditions.as_deref()),
        medications = or_unknown(profile.medications.as_deref()),
        falls = yes_no(profile.has_previous_falls),
        fall_description = or_unknown(profile.fall_description.as_deref()),
        sleep_hours = number_or_unknown(profile.sleep_hours),
        mobility = or_unknown(profile.mobility_level.as_deref()),
        activity = or_unknown(profile.activity_level.as_deref()),
        living_alone = yes_no(profile.living_alone),
        height = number_or_unknown(profile.height),
        weight = number_or_unknown(profile.weight),
        language = or_unknown(profile.language.as_deref()),
        disclaimer = DISCLAIMER,
    )
}

/// Map stored turns to the generation API's role/parts vocabulary.
///
/// Storage says "assistant", the generation side says "model"; "user"
/// passes through. Order is preserved, oldest first.
pub fn to_generation_history(turns: &[ConversationTurn]) -> Vec<Content> {
    turns
        .iter()
        .map(|turn| Content::text(turn.role.as_generation_str(), &turn.message))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::turn::ChatRole;
    use chrono::Utc;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("31/12/2000", 2024, 6, 15, 23)]
    #[case("15/06/2000", 2024, 6, 15, 24)] // birthday today counts
    #[case("16/06/2000", 2024, 6, 15, 23)] // birthday tomorrow does not
    #[case("01/01/2024", 2024, 6, 15, 0)]
    fn test_age_on(
        #[case] dob: &str,
        #[case] y: i32,
        #[case] m: u32,
        #[case] d: u32,
        #[case] expected: i32,
    ) {
        assert_eq!(age_on(dob, date(y, m, d)), Some(expected));
    }

    #[rstest]
    #[case("not-a-date")]
    #[case("2000-12-31")] // wrong order
    #[case("31/13/2000")] // no 13th month
    #[case("")]
    fn test_age_on_invalid_input(#[case] dob: &str) {
        assert_eq!(age_on(dob, date(2024, 6, 15)), None);
    }

    #[test]
    fn test_invalid_dob_degrades_to_placeholder() {
        let profile = UserProfile {
            date_of_birth: Some("soon".to_string()),
            ..Default::default()
        };
        let instruction = render_instruction(Some(&profile), date(2024, 6, 15));
        assert!(instruction.contains("an unknown age (invalid date format)"));
    }

    #[test]
    fn test_instruction_embeds_profile_fields() {
        let profile = UserProfile {
            name: Some("Ana".to_string()),
            date_of_birth: Some("31/12/2000".to_string()),
            health_goals: Some("better sleep".to_string()),
            blood_group: Some("O+".to_string()),
            ..Default::default()
        };
        let instruction = render_instruction(Some(&profile), date(2024, 6, 15));
        assert!(instruction.contains("Ana"));
        assert!(instruction.contains("23 years old"));
        assert!(instruction.contains("better sleep"));
        assert!(instruction.contains("Blood Group: O+"));
        assert!(instruction.contains(DISCLAIMER));
    }

    #[test]
    fn test_sparse_profile_never_fails_and_keeps_disclaimer() {
        let instruction = render_instruction(Some(&UserProfile::default()), date(2024, 6, 15));
        assert!(instruction.contains("the user"));
        assert!(instruction.contains("an unknown age"));
        assert!(instruction.contains("general wellness"));
        assert!(instruction.contains("Gender: unknown"));
        assert!(instruction.contains(DISCLAIMER));
    }

    #[test]
    fn test_missing_profile_renders_generic_instruction() {
        let instruction = render_instruction(None, date(2024, 6, 15));
        assert!(instruction.contains("create a profile"));
        assert!(!instruction.contains("Known profile details"));
        assert!(instruction.contains(DISCLAIMER));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let profile = UserProfile {
            name: Some("Ana".to_string()),
            sleep_hours: Some(7.5),
            ..Default::default()
        };
        let today = date(2024, 6, 15);
        assert_eq!(
            render_instruction(Some(&profile), today),
            render_instruction(Some(&profile), today)
        );
    }

    #[test]
    fn test_history_mapping_translates_assistant_to_model() {
        let now = Utc::now();
        let turns = vec![
            ConversationTurn::new(ChatRole::User, "u1", now),
            ConversationTurn::new(ChatRole::Assistant, "m", now),
        ];
        let contents = to_generation_history(&turns);
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[1].parts[0].text, "m");
    }

    #[test]
    fn test_history_mapping_preserves_order() {
        let now = Utc::now();
        let turns: Vec<ConversationTurn> = (0..4)
            .map(|i| ConversationTurn::new(ChatRole::User, &format!("msg{}", i), now))
            .collect();
        let contents = to_generation_history(&turns);
        let texts: Vec<&str> = contents
            .iter()
            .map(|c| c.parts[0].text.as_str())
            .collect();
        assert_eq!(texts, vec!["msg0", "msg1", "msg2", "msg3"]);
    }
}
