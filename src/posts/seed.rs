use uuid::Uuid;

use crate::posts::repo_types::NewPost;

struct Sample {
    title: &'static str,
    cast: &'static str,
    quality: &'static str,
    description: &'static str,
    download_link: &'static str,
    photo_link: &'static str,
}

const SAMPLES: [Sample; 15] = [
    Sample {
        title: "The Dark Knight Rises",
        cast: "Christian Bale, Tom Hardy, Anne Hathaway, Michael Caine",
        quality: "1080p",
        description: "Eight years after the Joker's reign of anarchy, Batman, with the help of the enigmatic Catwoman, is forced from his exile to save Gotham City from the brutal guerrilla terrorist Bane.",
        download_link: "https://example.com/download1",
        photo_link: "https://picsum.photos/400/600?random=1",
    },
    Sample {
        title: "Inception",
        cast: "Leonardo DiCaprio, Marion Cotillard, Tom Hardy, Joseph Gordon-Levitt",
        quality: "4K",
        description: "A thief who steals corporate secrets through the use of dream-sharing technology is given the inverse task of planting an idea into the mind of a C.E.O.",
        download_link: "https://example.com/download2",
        photo_link: "https://picsum.photos/400/600?random=2",
    },
    Sample {
        title: "Interstellar",
        cast: "Matthew McConaughey, Anne Hathaway, Jessica Chastain, Michael Caine",
        quality: "1080p",
        description: "A team of explorers travel through a wormhole in space in an attempt to ensure humanity's survival.",
        download_link: "https://example.com/download3",
        photo_link: "https://picsum.photos/400/600?random=3",
    },
    Sample {
        title: "The Matrix",
        cast: "Keanu Reeves, Laurence Fishburne, Carrie-Anne Moss, Hugo Weaving",
        quality: "720p",
        description: "A computer hacker learns from mysterious rebels about the true nature of his reality and his role in the war against its controllers.",
        download_link: "https://example.com/download4",
        photo_link: "https://picsum.photos/400/600?random=2",
    },
    Sample {
        title: "Blade Runner 2049",
        cast: "Ryan Gosling, Harrison Ford, Ana de Armas, Sylvia Hoeks",
        quality: "4K",
        description: "A young blade runner's discovery of a long-buried secret leads him to track down former blade runner Rick Deckard, who's been missing for thirty years.",
        download_link: "https://example.com/download5",
        photo_link: "https://picsum.photos/400/600?random=1",
    },
    Sample {
        title: "Mad Max: Fury Road",
        cast: "Tom Hardy, Charlize Theron, Nicholas Hoult, Hugh Keays-Byrne",
        quality: "1080p",
        description: "In a post-apocalyptic wasteland, Max teams up with a mysterious warrior to escape from a tyrannical warlord.",
        download_link: "https://example.com/download6",
        photo_link: "https://picsum.photos/400/600?random=3",
    },
    Sample {
        title: "Dune",
        cast: "Timothée Chalamet, Rebecca Ferguson, Oscar Isaac, Josh Brolin",
        quality: "4K",
        description: "Feature adaptation of Frank Herbert's science fiction novel about the son of a noble family entrusted with the protection of the most valuable asset in the galaxy.",
        download_link: "https://example.com/download7",
        photo_link: "https://picsum.photos/400/600?random=2",
    },
    Sample {
        title: "Tenet",
        cast: "John David Washington, Robert Pattinson, Elizabeth Debicki, Kenneth Branagh",
        quality: "1080p",
        description: "Armed with only one word, Tenet, and fighting for the survival of the entire world, a Protagonist journeys through a twilight world of international espionage.",
        download_link: "https://example.com/download8",
        photo_link: "https://picsum.photos/400/600?random=1",
    },
    Sample {
        title: "The Prestige",
        cast: "Christian Bale, Hugh Jackman, Scarlett Johansson, Michael Caine",
        quality: "720p",
        description: "After a tragic accident, two stage magicians engage in a battle to create the ultimate illusion while sacrificing everything they have to outwit each other.",
        download_link: "https://example.com/download9",
        photo_link: "https://picsum.photos/400/600?random=3",
    },
    Sample {
        title: "Arrival",
        cast: "Amy Adams, Jeremy Renner, Forest Whitaker, Michael Stuhlbarg",
        quality: "1080p",
        description: "A linguist is recruited by the military to communicate with alien lifeforms after twelve mysterious spacecraft appear around the world.",
        download_link: "https://example.com/download10",
        photo_link: "https://picsum.photos/400/600?random=2",
    },
    Sample {
        title: "Ex Machina",
        cast: "Domhnall Gleeson, Alicia Vikander, Oscar Isaac, Sonoya Mizuno",
        quality: "720p",
        description: "A young programmer is selected to participate in a ground-breaking experiment in synthetic intelligence by evaluating the human qualities of a breath-taking humanoid A.I.",
        download_link: "https://example.com/download11",
        photo_link: "https://picsum.photos/400/600?random=1",
    },
    Sample {
        title: "Her",
        cast: "Joaquin Phoenix, Amy Adams, Scarlett Johansson, Rooney Mara",
        quality: "1080p",
        description: "In a near future, a lonely writer develops an unlikely relationship with an operating system designed to meet his every need.",
        download_link: "https://example.com/download12",
        photo_link: "https://picsum.photos/400/600?random=3",
    },
    Sample {
        title: "Gravity",
        cast: "Sandra Bullock, George Clooney, Ed Harris, Orto Ignatiussen",
        quality: "4K",
        description: "Two astronauts work together to survive after an accident leaves them stranded in space.",
        download_link: "https://example.com/download13",
        photo_link: "https://picsum.photos/400/600?random=2",
    },
    Sample {
        title: "Edge of Tomorrow",
        cast: "Tom Cruise, Emily Blunt, Bill Paxton, Brendan Gleeson",
        quality: "1080p",
        description: "A soldier fighting aliens gets to relive the same day over and over again, the day restarting every time he dies.",
        download_link: "https://example.com/download14",
        photo_link: "https://picsum.photos/400/600?random=1",
    },
    Sample {
        title: "Annihilation",
        cast: "Natalie Portman, Jennifer Jason Leigh, Tessa Thompson, Oscar Isaac",
        quality: "720p",
        description: "A biologist signs up for a dangerous, secret expedition into a mysterious zone where the laws of nature don't apply.",
        download_link: "https://example.com/download15",
        photo_link: "https://picsum.photos/400/600?random=3",
    },
];

/// The fixed sample catalog, attributed to `uploaded_by`. No files, only photo links.
pub fn sample_posts(uploaded_by: Uuid) -> Vec<NewPost> {
    SAMPLES
        .iter()
        .map(|s| NewPost {
            title: s.title.to_string(),
            cast: s.cast.to_string(),
            quality: s.quality.to_string(),
            description: s.description.to_string(),
            download_link: s.download_link.to_string(),
            photo_link: s.photo_link.to_string(),
            thumbnail: None,
            photo: None,
            video: None,
            uploaded_by,
        })
        .collect()
}
