use super::{BlogPost, Localized};
use time::macros::datetime;

pub static POSTS: [BlogPost; 3] = [
    BlogPost {
        id: 3,
        title: Localized::new("The Role of Detailed Design", "详细设计的作用"),
        summary: Localized::new(
            "For junior engineers facing challenging tasks with tight deadlines, detailed design is the key to managing complexity, coordinating with teams, and ensuring reasonable schedules.",
            "对于初级工程师遇到有挑战的开发任务，详细设计是应对复杂需求、协同各方、争取合理排期的关键。",
        ),
        content: Localized::new(
            include_str!("../../../content/blog/3.en.html"),
            include_str!("../../../content/blog/3.zh.html"),
        ),
        published_at: datetime!(2025-11-02 10:00 UTC),
        author: Some("One Point Star"),
        tags: &[
            "software-engineering",
            "development-process",
            "detailed-design",
            "project-management",
            "career-advice",
        ],
        image: Some("/blog/blog3.jpg"),
    },
    BlogPost {
        id: 2,
        title: Localized::new(
            "Indie Kickoff First Month Summary",
            "Indie Kickoff第一个月的总结",
        ),
        summary: Localized::new(
            "The first step is always the hardest, but also the most powerful one.",
            "第一步永远最难，但也是最有力量的一步。",
        ),
        content: Localized::new(
            include_str!("../../../content/blog/2.en.html"),
            include_str!("../../../content/blog/2.zh.html"),
        ),
        published_at: datetime!(2025-10-28 10:00 UTC),
        author: Some("One Point Star"),
        tags: &[
            "indie hacker",
            "monthly-summary",
            "product-development",
            "operational-growth",
        ],
        image: Some("/blog/blog2.jpg"),
    },
    BlogPost {
        id: 1,
        title: Localized::new(
            "How Programmers Can Write Code for Themselves",
            "程序员如何为自己写代码",
        ),
        summary: Localized::new(
            "A reflection on the journey from corporate developer to indie hacker, exploring how to find meaning and value in coding by building products that serve real needs and generate sustainable income.",
            "从企业开发者到独立开发者的思考，探索如何通过构建真正有用的产品来找到编程的意义和价值，实现可持续的收入。",
        ),
        content: Localized::new(
            include_str!("../../../content/blog/1.en.html"),
            include_str!("../../../content/blog/1.zh.html"),
        ),
        published_at: datetime!(2025-10-25 10:00 UTC),
        author: Some("One Point Star"),
        tags: &["indie hacker", "programming", "entrepreneurship", "reflection"],
        image: Some("/blog/blog1-1.jpg"),
    },
];
