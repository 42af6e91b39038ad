//! Demo data for the `fixture` backend.

use chrono::{DateTime, Days, NaiveDate, Utc};

use super::memory::Collections;
use crate::models::{
    DailyFocus, Priority, Project, Task, UserId, WikiCategory, WikiEntry, WikiStatus,
};

/// Builds the demo collections for `user`, dated around `today`.
pub fn seed_fixture(user: &UserId, today: NaiveDate, now: DateTime<Utc>) -> Collections {
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);

    let project = |id: u64, title: &str, description: &str, emoji: &str, color: &str| Project {
        id,
        user_id: user.clone(),
        title: title.to_string(),
        description: Some(description.to_string()),
        emoji: Some(emoji.to_string()),
        color: color.to_string(),
        completed: false,
        created_at: now,
        updated_at: now,
    };

    let task = |id: u64, title: &str, description: &str, emoji: &str, priority: Priority, project_id: u64| Task {
        id,
        user_id: user.clone(),
        title: title.to_string(),
        description: Some(description.to_string()),
        emoji: Some(emoji.to_string()),
        priority,
        completed: false,
        starred: false,
        due_date: Some(today),
        project_id: Some(project_id),
        created_at: now,
        updated_at: now,
    };

    let wiki = |id: u64, title: &str, summary: &str, tags: &[&str], category: WikiCategory, status: WikiStatus| {
        WikiEntry {
            id,
            user_id: user.clone(),
            title: title.to_string(),
            summary: summary.to_string(),
            content: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            category,
            status,
            priority: Priority::Medium,
            is_public: false,
            rating: None,
            related_links: Vec::new(),
            file_urls: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    };

    let projects = vec![
        project(1, "Cosmic Productivity", "Master the art of space-age task management", "🚀", "#6366f1"),
        project(2, "Learning Journey", "Expand knowledge across the universe", "📚", "#8b5cf6"),
        project(3, "Health & Wellness", "Maintain astronaut-level fitness", "💪", "#10b981"),
    ];

    let mut review = task(1, "Review mission objectives", "Check today's goals and priorities", "🎯", Priority::High, 1);
    review.starred = true;
    let training = task(
        2,
        "Complete space training module",
        "Finish the advanced navigation course",
        "🧑‍🚀",
        Priority::Medium,
        2,
    );
    let mut meditation = task(3, "Morning cosmic meditation", "Center yourself for the day ahead", "🧘", Priority::Low, 3);
    meditation.completed = true;

    let focuses = vec![
        DailyFocus {
            id: 1,
            user_id: user.clone(),
            focus_date: today,
            title: "Master Cosmic Productivity".to_string(),
            description: Some(
                "Focus on completing high-priority mission objectives and maintaining stellar performance throughout the day"
                    .to_string(),
            ),
            completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        },
        DailyFocus {
            id: 2,
            user_id: user.clone(),
            focus_date: yesterday,
            title: "Deep Space Learning".to_string(),
            description: Some("Absorb new knowledge and expand cosmic understanding".to_string()),
            completed: true,
            completed_at: Some(now),
            created_at: now,
            updated_at: now,
        },
    ];

    let mut checklist = wiki(
        1,
        "Launch checklist",
        "Steps before starting a deep-work session",
        &["Productivity", "routine"],
        WikiCategory::Work,
        WikiStatus::Published,
    );
    checklist.is_public = true;
    checklist.rating = Some(5);
    checklist.priority = Priority::High;
    let mut navigation = wiki(
        2,
        "Navigation course notes",
        "Key ideas from the advanced module",
        &["learning", "navigation"],
        WikiCategory::Learning,
        WikiStatus::Draft,
    );
    navigation.related_links = vec!["https://example.com/navigation".to_string()];

    Collections {
        tasks: vec![review, training, meditation],
        projects,
        focuses,
        reflections: Vec::new(),
        wiki: vec![
            checklist,
            navigation,
            wiki(
                3,
                "Side project ideas",
                "Things to build on a quiet weekend",
                &["ideas", "productivity"],
                WikiCategory::Ideas,
                WikiStatus::Draft,
            ),
            wiki(
                4,
                "Old sprint retro",
                "Notes kept for reference",
                &["work", "retro"],
                WikiCategory::Work,
                WikiStatus::Archived,
            ),
        ],
    }
}
