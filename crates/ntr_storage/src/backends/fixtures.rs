//! Sample articles served when no hosted database is configured.

use chrono::{DateTime, Utc};
use ntr_core::Article;

struct Fixture {
    id: &'static str,
    slug: &'static str,
    title: &'static str,
    excerpt: &'static str,
    category: &'static str,
    author: &'static str,
    published_at: &'static str,
    image: &'static str,
    image_alt: Option<&'static str>,
    featured: bool,
    read_time: u32,
}

const FIXTURES: &[Fixture] = &[
    Fixture {
        id: "1",
        slug: "new-series-premiere-review",
        title: "The New Series Everyone's Binging Just Dropped Its Finale",
        excerpt: "We break down the finale and what it means for season two.",
        category: "TV",
        author: "Jordan Lee",
        published_at: "2026-02-25T08:00:00Z",
        image: "https://images.unsplash.com/photo-1522869635100-9f4c5e86aa37?w=400&q=80",
        image_alt: None,
        featured: false,
        read_time: 4,
    },
    Fixture {
        id: "2",
        slug: "streaming-wars-whats-next",
        title: "Streaming Wars: What's Next for Your Favorite Platforms",
        excerpt: "Major shifts are coming to how we watch. A deep dive into the future of streaming.",
        category: "TV",
        author: "Jordan Lee",
        published_at: "2026-02-24T14:30:00Z",
        image: "https://images.unsplash.com/photo-1574375927938-c5a448332a3e?w=800&q=80",
        image_alt: Some("Streaming on TV"),
        featured: true,
        read_time: 6,
    },
    Fixture {
        id: "3",
        slug: "indie-game-of-the-year-contenders",
        title: "Indie Game of the Year: Early Contenders for 2026",
        excerpt: "Small studios are delivering big experiences. These titles are already turning heads.",
        category: "Gaming",
        author: "Sam Chen",
        published_at: "2026-02-23T09:15:00Z",
        image: "https://images.unsplash.com/photo-1538481199705-c710c4e965fc?w=800&q=80",
        image_alt: Some("Gaming setup"),
        featured: true,
        read_time: 7,
    },
    Fixture {
        id: "4",
        slug: "ai-in-creative-industries",
        title: "How AI Is Reshaping the Creative Industries",
        excerpt: "From scriptwriting to visual effects, artificial intelligence is everywhere in entertainment.",
        category: "Tech",
        author: "Morgan Blake",
        published_at: "2026-02-22T16:00:00Z",
        image: "https://images.unsplash.com/photo-1677442136019-21780ecad995?w=800&q=80",
        image_alt: Some("AI and creativity"),
        featured: true,
        read_time: 10,
    },
    Fixture {
        id: "5",
        slug: "cultural-moments-that-defined-february",
        title: "The Cultural Moments That Defined February 2026",
        excerpt: "A look back at the events, releases, and trends that had everyone talking.",
        category: "Culture",
        author: "Riley Park",
        published_at: "2026-02-21T11:45:00Z",
        image: "https://images.unsplash.com/photo-1493225457124-a3eb161ffa5f?w=800&q=80",
        image_alt: Some("Concert crowd"),
        featured: true,
        read_time: 5,
    },
    Fixture {
        id: "7",
        slug: "retro-gaming-comeback",
        title: "Why Retro Gaming Is Bigger Than Ever in 2026",
        excerpt: "Nostalgia meets modern convenience in the resurgence of classic games.",
        category: "Gaming",
        author: "Sam Chen",
        published_at: "2026-02-24T12:00:00Z",
        image: "https://images.unsplash.com/photo-1550745165-9bc0b252726f?w=400&q=80",
        image_alt: None,
        featured: false,
        read_time: 6,
    },
    Fixture {
        id: "8",
        slug: "documentary-filmmaking-today",
        title: "Documentary Filmmaking in the Age of Streaming",
        excerpt: "How platforms are changing the way we tell true stories.",
        category: "Movies",
        author: "Alex Rivera",
        published_at: "2026-02-23T15:30:00Z",
        image: "https://images.unsplash.com/photo-1440404653323-ab43d7dd2f2a?w=400&q=80",
        image_alt: None,
        featured: false,
        read_time: 7,
    },
    Fixture {
        id: "9",
        slug: "podcasts-that-shaped-culture",
        title: "The Podcasts That Shaped Pop Culture This Year",
        excerpt: "From true crime to comedy, these shows had the biggest impact.",
        category: "Culture",
        author: "Riley Park",
        published_at: "2026-02-22T09:00:00Z",
        image: "https://images.unsplash.com/photo-1478737270239-2f02b77fc618?w=400&q=80",
        image_alt: None,
        featured: false,
        read_time: 5,
    },
    Fixture {
        id: "10",
        slug: "behind-the-scenes-mega-franchise",
        title: "Behind the Scenes of the Year's Biggest Franchise",
        excerpt: "An exclusive look at how the team brought this universe to life.",
        category: "Movies",
        author: "Alex Rivera",
        published_at: "2026-02-20T10:00:00Z",
        image: "https://images.unsplash.com/photo-1594909122845-11baa439b7bf?w=600&q=80",
        image_alt: None,
        featured: false,
        read_time: 12,
    },
    Fixture {
        id: "11",
        slug: "ten-best-shows-decade",
        title: "The 10 Best Shows of the Decade (So Far), Ranked",
        excerpt: "A definitive ranking of the series that defined the 2020s.",
        category: "TV",
        author: "Jordan Lee",
        published_at: "2026-02-19T14:00:00Z",
        image: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=600&q=80",
        image_alt: None,
        featured: false,
        read_time: 15,
    },
    Fixture {
        id: "12",
        slug: "indie-games-you-missed",
        title: "10 Indie Games You Might Have Missed (And Why You Should Play Them)",
        excerpt: "Hidden gems that deserve a spot on your playlist.",
        category: "Gaming",
        author: "Sam Chen",
        published_at: "2026-02-18T11:00:00Z",
        image: "https://images.unsplash.com/photo-1511512578047-dfb367046420?w=600&q=80",
        image_alt: None,
        featured: false,
        read_time: 8,
    },
    Fixture {
        id: "13",
        slug: "marvel-phase-six-rumors",
        title: "Marvel Phase Six: Every Rumor and Confirmed Project So Far",
        excerpt: "The next chapter of the MCU is taking shape. Here's what we know.",
        category: "Movies",
        author: "Alex Rivera",
        published_at: "2026-02-25T07:00:00Z",
        image: "https://images.unsplash.com/photo-1635805737707-575885ab0820?w=400&q=80",
        image_alt: None,
        featured: false,
        read_time: 6,
    },
    Fixture {
        id: "14",
        slug: "hbo-max-originals-2026",
        title: "HBO Max Originals 2026: Full Slate Revealed",
        excerpt: "From returning favorites to bold new series, the lineup is stacked.",
        category: "TV",
        author: "Jordan Lee",
        published_at: "2026-02-25T06:30:00Z",
        image: "https://images.unsplash.com/photo-1522869635100-9f4c5e86aa37?w=400&q=80",
        image_alt: None,
        featured: false,
        read_time: 5,
    },
    Fixture {
        id: "15",
        slug: "nintendo-next-console-leaks",
        title: "Nintendo's Next Console: Latest Leaks and What to Expect",
        excerpt: "Rumors are heating up. We analyze every leak and report.",
        category: "Gaming",
        author: "Sam Chen",
        published_at: "2026-02-24T22:00:00Z",
        image: "https://images.unsplash.com/photo-1578303512597-81e6cc155b3e?w=400&q=80",
        image_alt: None,
        featured: false,
        read_time: 7,
    },
    Fixture {
        id: "16",
        slug: "privacy-tools-2026",
        title: "Best Privacy Tools for 2026: A Practical Guide",
        excerpt: "Protect your data with these recommended apps and services.",
        category: "Tech",
        author: "Morgan Blake",
        published_at: "2026-02-24T18:00:00Z",
        image: "https://images.unsplash.com/photo-1563986768609-322da13575f3?w=400&q=80",
        image_alt: None,
        featured: false,
        read_time: 9,
    },
    Fixture {
        id: "17",
        slug: "festival-season-preview",
        title: "Festival Season 2026: What to Watch and Where",
        excerpt: "A guide to the biggest film and music festivals around the world.",
        category: "Culture",
        author: "Riley Park",
        published_at: "2026-02-24T14:00:00Z",
        image: "https://images.unsplash.com/photo-1459749411175-04bf5292ceea?w=400&q=80",
        image_alt: None,
        featured: false,
        read_time: 6,
    },
    Fixture {
        id: "18",
        slug: "sci-fi-books-adaptations",
        title: "Sci-Fi Books Getting the Adaptation Treatment in 2026",
        excerpt: "Your favorite novels are heading to screen. Here's the list.",
        category: "Movies",
        author: "Alex Rivera",
        published_at: "2026-02-24T10:00:00Z",
        image: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400&q=80",
        image_alt: None,
        featured: false,
        read_time: 4,
    },
];

impl Fixture {
    fn to_article(&self) -> Article {
        Article {
            id: self.id.to_string(),
            slug: self.slug.to_string(),
            title: self.title.to_string(),
            excerpt: self.excerpt.to_string(),
            category: self.category.to_string(),
            category_slug: ntr_core::categories::category_slug(self.category),
            author: self.author.to_string(),
            published_at: DateTime::parse_from_rfc3339(self.published_at)
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or_default(),
            image: self.image.to_string(),
            image_alt: self.image_alt.map(str::to_string),
            featured: self.featured.then_some(true),
            read_time: Some(self.read_time),
            body: None,
        }
    }
}

/// The fixture set, newest first.
pub fn sample_articles() -> Vec<Article> {
    let mut articles: Vec<Article> = FIXTURES.iter().map(Fixture::to_article).collect();
    ntr_core::storage::sort_newest_first(&mut articles);
    articles
}
