//! Plain-text rendering of backend records.

use std::fmt::Write;

use storyline_models::{
    Choice, ChoiceOutcome, Episode, JournalEntry, Profile, Progress, QuizQuestion, Story, User,
};

pub fn user(user: &User) -> String {
    format!("{} <{}> [{}]", user.label(), user.email, user.role.as_str())
}

pub fn story_line(story: &Story) -> String {
    let mut line = format!("{}  {}", story.id, story.title);
    if let Some(count) = story.episode_count {
        let _ = write!(line, " ({} episodes)", count);
    }
    if story.is_published == Some(false) {
        line.push_str(" [draft]");
    }
    line
}

pub fn story(story: &Story) -> String {
    let mut out = story_line(story);
    if let Some(description) = story.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(out, "\n\n{}", description);
    }
    out
}

pub fn choice_line(choice: &Choice) -> String {
    let mut line = format!("{}  {}", choice.id, choice.text);
    if let Some(next) = choice.next_episode_index {
        let _ = write!(line, " -> episode {}", next);
    }
    if let Some(xp) = choice.xp_reward {
        let _ = write!(line, " (+{} XP)", xp);
    }
    line
}

pub fn quiz_question(question: &QuizQuestion) -> String {
    let mut out = format!("{}  {}", question.id, question.prompt);
    for (i, option) in question.options.iter().enumerate() {
        let marker = if question.correct_option_index == Some(i as u32) {
            "*"
        } else {
            " "
        };
        let _ = write!(out, "\n   {}{}. {}", marker, i, option);
    }
    out
}

pub fn episode(episode: &Episode) -> String {
    let mut out = format!("Episode {}: {}\n\n{}", episode.index, episode.title, episode.content);
    if !episode.choices.is_empty() {
        out.push_str("\n\nChoices:");
        for choice in &episode.choices {
            let _ = write!(out, "\n  {}", choice_line(choice));
        }
    }
    if !episode.quiz_questions.is_empty() {
        out.push_str("\n\nQuiz:");
        for question in &episode.quiz_questions {
            let _ = write!(out, "\n  {}", quiz_question(question));
        }
    }
    out
}

pub fn outcome(outcome: &ChoiceOutcome) -> String {
    let mut parts = Vec::new();
    if let Some(xp) = outcome.xp_awarded {
        parts.push(format!("+{} XP", xp));
    }
    if let Some(total) = outcome.total_xp {
        parts.push(format!("total {} XP", total));
    }
    match (outcome.completed, outcome.next_episode_index) {
        (Some(true), _) => parts.push("story completed".to_string()),
        (_, Some(next)) => parts.push(format!("next episode {}", next)),
        _ => {}
    }
    if parts.is_empty() {
        "Choice recorded".to_string()
    } else {
        format!("Choice recorded: {}", parts.join(", "))
    }
}

pub fn progress(progress: &Progress) -> String {
    let mut out = format!("Total XP: {}", progress.total_xp);
    if let Some(level) = progress.level {
        let _ = write!(out, "  Level: {}", level);
    }
    let _ = write!(
        out,
        "\nStories completed: {}/{}",
        progress.completed_count(),
        progress.stories.len()
    );
    for story in &progress.stories {
        let status = if story.completed { "done" } else { "reading" };
        let _ = write!(
            out,
            "\n  {}  episode {} ({})",
            story.story_id, story.current_episode_index, status
        );
    }
    out
}

pub fn profile(profile: &Profile) -> String {
    let mut out = format!(
        "{} <{}> [{}]",
        profile.display_name.as_deref().unwrap_or("-"),
        profile.email,
        profile.role.as_str()
    );
    if let Some(bio) = &profile.bio {
        let _ = write!(out, "\nBio: {}", bio);
    }
    if let Some(url) = &profile.avatar_url {
        let _ = write!(out, "\nAvatar: {}", url);
    }
    if let Some(xp) = profile.total_xp {
        let _ = write!(out, "\nXP: {}", xp);
    }
    out
}

pub fn journal_entry(entry: &JournalEntry) -> String {
    match entry.created_at {
        Some(at) => format!("{}  {}", at.format("%Y-%m-%d %H:%M"), entry.content),
        None => entry.content.clone(),
    }
}
