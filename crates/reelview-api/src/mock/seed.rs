//! Seed data for the mock catalog.

use crate::catalog::{ContentId, ContentItem, ContentType, Profile, ProfileId};

/// Poster base URL.
const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500/";

/// Backdrop/logo base URL.
const ORIGINAL_BASE: &str = "https://image.tmdb.org/t/p/original/";

/// Trailer base URL.
const TRAILER_BASE: &str = "https://www.youtube.com/watch?v=";

/// ID of the hero item.
pub(super) const FEATURED_ID: u32 = 25;

/// Row name to member IDs, in display order.
pub(super) const ROWS: &[(&str, &[u32])] = &[
    ("trending", &[1, 2, 3, 4, 5, 6]),
    ("popular", &[7, 8, 9, 10, 11, 12]),
];

/// A static catalog entry.
struct SeedItem {
    id: u32,
    title: &'static str,
    poster: &'static str,
    kind: ContentType,
    rating: &'static str,
    year: &'static str,
    genres: &'static [&'static str],
    trailer: &'static str,
}

/// Catalog entries, in catalog order.
const CATALOG: &[SeedItem] = &[
    SeedItem {
        id: 1,
        title: "The Witcher",
        poster: "cZ0d3rtvXPVvuiX22sP79K3Hmjz.jpg",
        kind: ContentType::Series,
        rating: "TV-MA",
        year: "2023",
        genres: &["Fantasy", "Adventure"],
        trailer: "ndl1W4ltcmg",
    },
    SeedItem {
        id: 2,
        title: "Wednesday",
        poster: "9PFonBhy4cQy7Jz20NpMygczOkv.jpg",
        kind: ContentType::Series,
        rating: "TV-14",
        year: "2022",
        genres: &["Comedy", "Horror"],
        trailer: "Di310WS8zLk",
    },
    SeedItem {
        id: 3,
        title: "Avatar: The Way of Water",
        poster: "t6HIqrRAclMCA60NsSmeqe9RmNV.jpg",
        kind: ContentType::Movie,
        rating: "PG-13",
        year: "2022",
        genres: &["Action", "Adventure"],
        trailer: "d9MyW72ELq0",
    },
    SeedItem {
        id: 4,
        title: "House of the Dragon",
        poster: "7QMsOTMUswlwxJP0rTTZfmz2tX2.jpg",
        kind: ContentType::Series,
        rating: "TV-MA",
        year: "2022",
        genres: &["Drama", "Fantasy"],
        trailer: "DotnJ7tTA34",
    },
    SeedItem {
        id: 5,
        title: "Top Gun: Maverick",
        poster: "62HCnUTziyWcpDaBO2i1DX17ljH.jpg",
        kind: ContentType::Movie,
        rating: "PG-13",
        year: "2022",
        genres: &["Action", "Drama"],
        trailer: "qSqVVswa420",
    },
    SeedItem {
        id: 6,
        title: "Squid Game",
        poster: "dDlEmu3EZ0Pgg93K2SVNLCjCSvE.jpg",
        kind: ContentType::Series,
        rating: "TV-MA",
        year: "2021",
        genres: &["Thriller", "Drama"],
        trailer: "oqxAJKy0ii4",
    },
    SeedItem {
        id: 7,
        title: "Glass Onion",
        poster: "vDGr1YdrlfbU9wxTOdpf3zChmv9.jpg",
        kind: ContentType::Movie,
        rating: "PG-13",
        year: "2022",
        genres: &["Mystery", "Comedy"],
        trailer: "gj3kSbN1fKE",
    },
    SeedItem {
        id: 8,
        title: "The Crown",
        poster: "1M876KPjulVwppEpldhdc8V4o68.jpg",
        kind: ContentType::Series,
        rating: "TV-MA",
        year: "2022",
        genres: &["Drama", "History"],
        trailer: "JWtnJjn6ng0",
    },
    SeedItem {
        id: 9,
        title: "Ozark",
        poster: "m73QxpHH1FAFWxFPKvhEgziLJvR.jpg",
        kind: ContentType::Series,
        rating: "TV-MA",
        year: "2022",
        genres: &["Crime", "Drama"],
        trailer: "5hAXVqrljbs",
    },
    SeedItem {
        id: 10,
        title: "Black Mirror",
        poster: "5UaYsGZOFhjFDwQs6UsHwfTBVAo.jpg",
        kind: ContentType::Series,
        rating: "TV-MA",
        year: "2023",
        genres: &["Sci-Fi", "Thriller"],
        trailer: "jROLrhQkK78",
    },
    SeedItem {
        id: 11,
        title: "The Batman",
        poster: "74xTEgt2ePMa1cqrgOXhUzaTNiN.jpg",
        kind: ContentType::Movie,
        rating: "PG-13",
        year: "2022",
        genres: &["Action", "Crime"],
        trailer: "mqqft2x_Aa4",
    },
    SeedItem {
        id: 12,
        title: "Money Heist",
        poster: "reEMJA1uzscCbkpeRJeTT2bjqUp.jpg",
        kind: ContentType::Series,
        rating: "TV-MA",
        year: "2021",
        genres: &["Crime", "Thriller"],
        trailer: "_InqQJRqGW4",
    },
    SeedItem {
        id: 13,
        title: "John Wick: Chapter 4",
        poster: "vZloFAK7NmvMGKE7VkF5UHaz0I.jpg",
        kind: ContentType::Movie,
        rating: "R",
        year: "2023",
        genres: &["Action", "Thriller"],
        trailer: "qEVUtrk8_B4",
    },
    SeedItem {
        id: 14,
        title: "Extraction",
        poster: "wlfDxbUsVZb6YyObNFQSaFyR1eJ.jpg",
        kind: ContentType::Movie,
        rating: "R",
        year: "2023",
        genres: &["Action", "Thriller"],
        trailer: "L6P3nI6VnlY",
    },
    SeedItem {
        id: 15,
        title: "Fast X",
        poster: "4XddcRDtnNjYmLRMX5QuF16rFdv.jpg",
        kind: ContentType::Movie,
        rating: "PG-13",
        year: "2023",
        genres: &["Action", "Adventure"],
        trailer: "32RAq6JzY-w",
    },
    SeedItem {
        id: 16,
        title: "The Mandalorian",
        poster: "BbNvKCuEF4SRzFXR16aK6ISFtR.jpg",
        kind: ContentType::Series,
        rating: "TV-14",
        year: "2023",
        genres: &["Adventure", "Sci-Fi"],
        trailer: "eW7Twd85m2g",
    },
    SeedItem {
        id: 17,
        title: "Mission: Impossible",
        poster: "NNxYkU70HPurnNCSiCjYAmacwm.jpg",
        kind: ContentType::Movie,
        rating: "PG-13",
        year: "2023",
        genres: &["Action", "Adventure"],
        trailer: "avz06PDqDbM",
    },
    SeedItem {
        id: 18,
        title: "Cobra Kai",
        poster: "6POBWybSBDBKjSs1VAQcnQC1qyt.jpg",
        kind: ContentType::Series,
        rating: "TV-14",
        year: "2023",
        genres: &["Action", "Comedy"],
        trailer: "_rB36UGoP4Y",
    },
    SeedItem {
        id: 19,
        title: "Scream VI",
        poster: "wDWwtvkRRlgTiUr6TyLSMX8FCuZ.jpg",
        kind: ContentType::Movie,
        rating: "R",
        year: "2023",
        genres: &["Horror", "Thriller"],
        trailer: "h74AXqw4Opc",
    },
    SeedItem {
        id: 20,
        title: "The Nun II",
        poster: "5gzzkR7y3hnY8AD1wXjCnVlHba5.jpg",
        kind: ContentType::Movie,
        rating: "R",
        year: "2023",
        genres: &["Horror", "Mystery"],
        trailer: "QF-oyCwaArU",
    },
    SeedItem {
        id: 21,
        title: "Dark",
        poster: "rrwt6OZZbWpU1cBIMJlaq4FuFX0.jpg",
        kind: ContentType::Series,
        rating: "TV-MA",
        year: "2020",
        genres: &["Thriller", "Sci-Fi"],
        trailer: "rrwKHWZKvGQ",
    },
    SeedItem {
        id: 22,
        title: "You",
        poster: "7bEYdja5gfHWQXVOboJyp2uCnS6.jpg",
        kind: ContentType::Series,
        rating: "TV-MA",
        year: "2023",
        genres: &["Thriller", "Crime"],
        trailer: "srx7fSBwvF4",
    },
    SeedItem {
        id: 23,
        title: "Evil Dead Rise",
        poster: "mIBCtPvKZQlxubxKMeViO2UrP3q.jpg",
        kind: ContentType::Movie,
        rating: "R",
        year: "2023",
        genres: &["Horror", "Thriller"],
        trailer: "BuAeNBuJy7A",
    },
    SeedItem {
        id: 24,
        title: "Haunting of Hill House",
        poster: "38PkhBGRQtmVx2drvPik3F42qHO.jpg",
        kind: ContentType::Series,
        rating: "TV-MA",
        year: "2018",
        genres: &["Horror", "Drama"],
        trailer: "3eqP2Ey2Uko",
    },
    SeedItem {
        id: FEATURED_ID,
        title: "Stranger Things",
        poster: "49WJfeN0moxb9IPfGn8AIqMGskD.jpg",
        kind: ContentType::Series,
        rating: "TV-14",
        year: "2022",
        genres: &["Sci-Fi", "Horror", "Drama"],
        trailer: "b9EkMc79ZSU",
    },
];

impl SeedItem {
    fn to_item(&self) -> ContentItem {
        ContentItem {
            id: ContentId::from(self.id),
            tmdb_id: None,
            title: String::from(self.title),
            image: format!("{POSTER_BASE}{}", self.poster),
            backdrop: None,
            logo: None,
            content_type: self.kind,
            rating: Some(String::from(self.rating)),
            year: String::from(self.year),
            genres: self.genres.iter().map(|g| String::from(*g)).collect(),
            description: None,
            seasons: None,
            trailer_url: Some(format!("{TRAILER_BASE}{}", self.trailer)),
            vote_average: None,
            popularity: None,
            progress: None,
            episode_label: None,
            time_left_label: None,
        }
    }
}

/// Builds the catalog, decorating the hero item with its artwork and synopsis.
pub(super) fn catalog() -> Vec<ContentItem> {
    CATALOG
        .iter()
        .map(|seed| {
            let mut item = seed.to_item();
            if seed.id == FEATURED_ID {
                item.backdrop = Some(format!("{ORIGINAL_BASE}56v2KjBlU4XaOv9rVYEQypROD7P.jpg"));
                item.logo = Some(format!("{ORIGINAL_BASE}zGzahrglDLOIHlpHPM9OM6LN4sL.png"));
                item.seasons = Some(String::from("4 Seasons"));
                item.description = Some(String::from(
                    "When a young boy vanishes, a small town uncovers a mystery involving \
                     secret experiments, terrifying supernatural forces, and one strange \
                     little girl.",
                ));
            }
            item
        })
        .collect()
}

/// Default profiles.
pub(super) fn profiles() -> Vec<Profile> {
    [
        ("1", "John", "ce54bf11889067.562541ef7cde4.png", false),
        ("2", "Sarah", "1bdc9a11889067.562541ef52d36.png", false),
        ("3", "Kids", "bf6e4a11889067.562541ef6036f.png", true),
    ]
    .into_iter()
    .map(|(id, name, avatar, is_kids)| Profile {
        id: ProfileId::from(id),
        name: String::from(name),
        avatar: format!("https://mir-s3-cdn-cf.behance.net/project_modules/disp/{avatar}"),
        is_kids,
    })
    .collect()
}

/// Seeded "my list" members per profile ID.
pub(super) const MY_LISTS: &[(&str, &[u32])] = &[("1", &[FEATURED_ID, 7]), ("2", &[9])];

/// Seeded viewing progress: profile, content, percentage, episode, time left.
pub(super) const PROGRESS: &[(&str, u32, f64, &str, &str)] = &[
    ("1", 8, 60.0, "S5 E6", "28 min left"),
    ("1", 1, 45.0, "S3 E4", "32 min left"),
    ("1", FEATURED_ID, 75.0, "S4 E8", "15 min left"),
    ("2", 12, 30.0, "Part 2 E3", "41 min left"),
];
