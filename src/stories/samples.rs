use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::FarmStory;

struct Sample {
    username: &'static str,
    profile_pic: &'static str,
    title: &'static str,
    description: &'static str,
    likes: i64,
    views: i64,
    comments: i64,
    duration: &'static str,
    location: &'static str,
    crop: &'static str,
    tags: &'static [&'static str],
    age_hours: i64,
}

const SAMPLES: &[Sample] = &[
    Sample {
        username: "RajeshFarmer",
        profile_pic: "👨‍🌾",
        title: "Organic Tomato Harvest",
        description: "My first organic tomato harvest! 50kg in 2 months. No chemicals, just natural farming. 🍅",
        likes: 245,
        views: 1203,
        comments: 34,
        duration: "0:45",
        location: "Punjab",
        crop: "Tomatoes",
        tags: &["organic", "tomatoes", "success"],
        age_hours: 2,
    },
    Sample {
        username: "PriyaAgri",
        profile_pic: "👩‍🌾",
        title: "Smart Irrigation Technique",
        description: "Saved 40% water with drip irrigation. Best decision for my farm! 💧",
        likes: 189,
        views: 892,
        comments: 28,
        duration: "1:20",
        location: "Maharashtra",
        crop: "Cotton",
        tags: &["irrigation", "water-saving", "tips"],
        age_hours: 5,
    },
    Sample {
        username: "KumarFarms",
        profile_pic: "👨‍🌾",
        title: "Rice Transplantation Day",
        description: "Team work makes the dream work! Rice transplantation completed in 3 days. 🌾",
        likes: 312,
        views: 1567,
        comments: 45,
        duration: "0:58",
        location: "Tamil Nadu",
        crop: "Rice",
        tags: &["rice", "teamwork", "farming"],
        age_hours: 24,
    },
    Sample {
        username: "GreenThumbGita",
        profile_pic: "👩‍🌾",
        title: "Natural Pest Control",
        description: "Using neem oil spray to control pests naturally. No chemicals needed! 🌿",
        likes: 428,
        views: 2134,
        comments: 67,
        duration: "1:45",
        location: "Gujarat",
        crop: "Vegetables",
        tags: &["organic", "pest-control", "neem"],
        age_hours: 48,
    },
    Sample {
        username: "SunnyHarvest",
        profile_pic: "👨‍🌾",
        title: "Wheat Harvest Success",
        description: "Record breaking wheat harvest this season! Hard work pays off. 🌾✨",
        likes: 567,
        views: 3421,
        comments: 89,
        duration: "2:10",
        location: "Haryana",
        crop: "Wheat",
        tags: &["wheat", "harvest", "success"],
        age_hours: 72,
    },
    Sample {
        username: "BioFarmBharat",
        profile_pic: "👨‍🌾",
        title: "Composting Tutorial",
        description: "How I make organic compost from farm waste. Free fertilizer! ♻️",
        likes: 391,
        views: 1876,
        comments: 52,
        duration: "3:05",
        location: "Kerala",
        crop: "Mixed",
        tags: &["compost", "organic", "tutorial"],
        age_hours: 96,
    },
    Sample {
        username: "ModernKisan",
        profile_pic: "👨‍🌾",
        title: "Drone Spraying Demo",
        description: "Using drone technology for pesticide spraying. Future of farming! 🚁",
        likes: 623,
        views: 4152,
        comments: 112,
        duration: "1:30",
        location: "Karnataka",
        crop: "Cotton",
        tags: &["technology", "drone", "modern-farming"],
        age_hours: 120,
    },
    Sample {
        username: "OrganicOdisha",
        profile_pic: "👩‍🌾",
        title: "Vermicompost Making",
        description: "Step by step guide to vermicompost production. Worms are farmers best friends! 🪱",
        likes: 276,
        views: 1345,
        comments: 41,
        duration: "2:45",
        location: "Odisha",
        crop: "Vegetables",
        tags: &["vermicompost", "organic", "tutorial"],
        age_hours: 168,
    },
];

/// The starter feed, dated relative to `now`, newest first
pub fn sample_stories(now: DateTime<Utc>) -> Vec<FarmStory> {
    SAMPLES
        .iter()
        .map(|s| FarmStory {
            id: Uuid::new_v4(),
            username: s.username.to_string(),
            profile_pic: s.profile_pic.to_string(),
            title: s.title.to_string(),
            description: s.description.to_string(),
            video_thumbnail: "🎥".to_string(),
            video_url: String::new(),
            likes: s.likes,
            views: s.views,
            comments: s.comments,
            duration: s.duration.to_string(),
            location: s.location.to_string(),
            crop: s.crop.to_string(),
            tags: s.tags.iter().map(|t| t.to_string()).collect(),
            created_at: now - Duration::hours(s.age_hours),
        })
        .collect()
}
