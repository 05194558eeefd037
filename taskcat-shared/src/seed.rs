/// Fake data generation and database seeding
///
/// Generated values come from small built-in word lists so seeding needs no
/// network access and a seeded `StdRng` reproduces the same fixture set.
///
/// # Example
///
/// ```no_run
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use taskcat_shared::config::SeedSettings;
/// use taskcat_shared::seed::seed_database;
/// use taskcat_shared::store::MemoryTaskRepository;
///
/// # async fn example() -> taskcat_shared::error::CliResult<()> {
/// let repo = MemoryTaskRepository::new();
/// let mut rng = StdRng::seed_from_u64(7);
/// let report = seed_database(&repo, &SeedSettings::default(), &mut rng).await?;
/// assert_eq!(report.users, 15);
/// # Ok(())
/// # }
/// ```

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

use crate::config::SeedSettings;
use crate::error::{CliError, CliResult};
use crate::models::{CreateTask, CreateUser};
use crate::store::TaskRepository;

/// Tasks per user that get a description; later ones are left without
pub const DESCRIBED_TASKS_PER_USER: usize = 7;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Barbara", "Charles", "Claude", "Dennis", "Donald", "Edsger", "Frances",
    "Grace", "Hedy", "Ivan", "John", "Ken", "Linus", "Margaret", "Niklaus", "Radia", "Shafi",
    "Sophie", "Tim", "Whitfield", "Yukihiro", "Leslie", "Katherine", "Marvin", "Jean",
    "Oscar", "Felix", "Luna", "Milo", "Nala", "Simba", "Tigger", "Willow", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Lovelace", "Turing", "Liskov", "Babbage", "Shannon", "Ritchie", "Knuth", "Dijkstra",
    "Allen", "Hopper", "Lamarr", "Sutherland", "McCarthy", "Thompson", "Torvalds",
    "Hamilton", "Wirth", "Perlman", "Goldwasser", "Wilson", "Berners-Lee", "Diffie",
    "Matsumoto", "Lamport", "Johnson", "Minsky", "Sammet", "Backus", "Kay", "Floyd",
];

const DOMAINS: &[&str] = &[
    "example.com", "example.org", "example.net", "mail.test", "corp.test", "lab.test",
];

const WORDS: &[&str] = &[
    "fluffy", "vocal", "playful", "lazy", "curious", "striped", "grey", "ginger", "tabby",
    "shy", "brave", "sleepy", "hungry", "quick", "quiet", "review", "draft", "report",
    "budget", "meeting", "design", "update", "plan", "release", "schedule", "invoice",
    "archive", "backup", "server", "client", "outline", "summary", "feedback", "roadmap",
    "migrate", "deploy", "prepare", "confirm", "check", "write", "read", "send", "fix",
];

/// A random first name
pub fn first_name<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    FIRST_NAMES.choose(rng).copied().unwrap_or("Ada")
}

/// A random lowercase word
pub fn word<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    WORDS.choose(rng).copied().unwrap_or("task")
}

/// A random "First Last" name
pub fn full_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Lovelace");
    format!("{} {}", first_name(rng), last)
}

/// A random `first.last@domain` address built from its own generated name
pub fn email<R: Rng + ?Sized>(rng: &mut R) -> String {
    let local = full_name(rng).to_lowercase().replace(' ', ".");
    let domain = DOMAINS.choose(rng).copied().unwrap_or("example.com");
    format!("{}@{}", local, domain)
}

/// A capitalized sentence of 3 to 8 words ending in a period
pub fn sentence<R: Rng + ?Sized>(rng: &mut R) -> String {
    let count = rng.gen_range(3..=8);
    let mut words: Vec<String> = (0..count).map(|_| word(rng).to_string()).collect();
    if let Some(first) = words.first_mut() {
        let mut chars = first.chars();
        if let Some(c) = chars.next() {
            *first = c.to_uppercase().chain(chars).collect();
        }
    }
    format!("{}.", words.join(" "))
}

/// A short paragraph of 2 to 5 sentences
pub fn text<R: Rng + ?Sized>(rng: &mut R) -> String {
    let count = rng.gen_range(2..=5);
    (0..count)
        .map(|_| sentence(rng))
        .collect::<Vec<_>>()
        .join(" ")
}

/// What a seeding run inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub tasks: usize,
}

/// Inserts generated users and tasks
///
/// A generated email that already exists is skipped with a warning; any
/// other store failure aborts the run.
pub async fn seed_database<R, G>(
    repo: &R,
    settings: &SeedSettings,
    rng: &mut G,
) -> CliResult<SeedReport>
where
    R: TaskRepository + ?Sized,
    G: Rng + Send,
{
    let statuses = repo.list_statuses().await?;
    if statuses.is_empty() {
        return Err(CliError::Schema("the status table is empty".to_string()));
    }

    let mut report = SeedReport::default();
    let mut user_ids = Vec::with_capacity(settings.users);

    for _ in 0..settings.users {
        let data = CreateUser {
            fullname: full_name(rng),
            email: email(rng),
        };

        match repo.create_user(data).await {
            Ok(user) => {
                user_ids.push(user.id);
                report.users += 1;
            }
            Err(CliError::Conflict(reason)) => {
                warn!(reason = %reason, "Skipping generated user");
            }
            Err(e) => return Err(e),
        }
    }
    info!(users = report.users, "Seeded users");

    for &user_id in user_ids.iter().take(settings.users_with_tasks) {
        for i in 0..settings.tasks_per_user {
            let status_id = statuses
                .choose(rng)
                .map(|s| s.id)
                .unwrap_or(statuses[0].id);
            let data = CreateTask {
                title: sentence(rng),
                description: (i < DESCRIBED_TASKS_PER_USER).then(|| text(rng)),
                status_id,
                user_id,
            };
            repo.create_task(data).await?;
            report.tasks += 1;
        }
    }
    info!(tasks = report.tasks, "Seeded tasks");

    Ok(report)
}
