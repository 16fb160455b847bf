//! Built-in demo catalog
//!
//! Written into an empty store on first read. The content is part of the
//! stored-data contract and is kept verbatim.

use chrono::NaiveDate;
use eventify_common::{Event, EventCategory};
use eventify_config::DEFAULT_PLACEHOLDER_IMAGE;

/// Number of events in the seed catalog.
pub const SEED_COUNT: usize = 8;

struct SeedEvent {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: EventCategory,
    date: (i32, u32, u32),
    location: &'static str,
    available_spots: u32,
}

const SEED: [SeedEvent; SEED_COUNT] = [
    SeedEvent {
        id: "1",
        name: "Conferência de Tecnologia 2024",
        description: "Uma conferência completa sobre as últimas tendências em tecnologia, incluindo IA, blockchain e desenvolvimento web. Palestrantes renomados compartilharão suas experiências e conhecimentos.",
        category: EventCategory::Technology,
        date: (2024, 3, 15),
        location: "Centro de Convenções São Paulo",
        available_spots: 150,
    },
    SeedEvent {
        id: "2",
        name: "Festival de Música Eletrônica",
        description: "Uma noite inesquecível com os melhores DJs nacionais e internacionais. Música eletrônica de alta qualidade em um ambiente único.",
        category: EventCategory::Music,
        date: (2024, 3, 20),
        location: "Espaço das Américas",
        available_spots: 500,
    },
    SeedEvent {
        id: "3",
        name: "Workshop de Design UX/UI",
        description: "Aprenda os fundamentos do design de experiência do usuário e interface. Workshop prático com exercícios hands-on.",
        category: EventCategory::Workshops,
        date: (2024, 3, 25),
        location: "Coworking Tech Hub",
        available_spots: 30,
    },
    SeedEvent {
        id: "4",
        name: "Maratona de São Paulo",
        description: "Participe da maior maratona da América Latina. Percurso de 42km pelas principais avenidas da cidade.",
        category: EventCategory::Sports,
        date: (2024, 4, 5),
        location: "Ibirapuera - São Paulo",
        available_spots: 1000,
    },
    SeedEvent {
        id: "5",
        name: "Exposição de Arte Contemporânea",
        description: "Uma exposição única com obras de artistas contemporâneos brasileiros e internacionais.",
        category: EventCategory::Art,
        date: (2024, 4, 10),
        location: "Museu de Arte Moderna",
        available_spots: 200,
    },
    SeedEvent {
        id: "6",
        name: "Hackathon de Inovação",
        description: "Evento de 48 horas para desenvolver soluções inovadoras para problemas reais. Prêmios incríveis para os vencedores.",
        category: EventCategory::Technology,
        date: (2024, 4, 15),
        location: "Campus Universitário",
        available_spots: 80,
    },
    SeedEvent {
        id: "7",
        name: "Workshop de Fotografia",
        description: "Aprenda técnicas avançadas de fotografia com profissionais renomados. Inclui prática em estúdio e externa.",
        category: EventCategory::Workshops,
        date: (2024, 4, 20),
        location: "Estúdio Fotográfico Central",
        available_spots: 25,
    },
    SeedEvent {
        id: "8",
        name: "Show de Rock Nacional",
        description: "Uma noite especial com as melhores bandas de rock nacional. Nostalgia e energia em um só lugar.",
        category: EventCategory::Music,
        date: (2024, 4, 25),
        location: "Arena Anhembi",
        available_spots: 300,
    },
];

/// The seed catalog, in storage order.
pub fn default_events() -> Vec<Event> {
    SEED.iter()
        .filter_map(|seed| {
            let (year, month, day) = seed.date;
            let date = NaiveDate::from_ymd_opt(year, month, day)?;
            Some(Event {
                id: seed.id.to_string(),
                name: seed.name.to_string(),
                description: seed.description.to_string(),
                category: seed.category,
                date,
                location: seed.location.to_string(),
                available_spots: seed.available_spots,
                image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            })
        })
        .collect()
}
