use crate::models::{Difficulty, Topic};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Catalog entry as originally published, before authorship and timestamps
/// were tracked
fn legacy(
    id: &str,
    title: &str,
    slug: &str,
    description: &str,
    tags: &[&str],
    difficulty: Difficulty,
    duration_estimate: u32,
) -> Topic {
    Topic {
        id: id.to_string(),
        title: title.to_string(),
        slug: slug.to_string(),
        description: description.to_string(),
        tags: strings(tags),
        difficulty,
        duration_estimate,
        is_featured: false,
        learning_outcomes: vec![],
        prerequisites: vec![],
        related_portfolio_slug: None,
        author_id: None,
        created_at: None,
        updated_at: None,
    }
}

/// Get the built-in catalog topics
pub fn seed_topics() -> Vec<Topic> {
    vec![
        Topic {
            is_featured: true,
            ..legacy(
                "1",
                "Prompt Engineering Fundamentals",
                "prompt-engineering-fundamentals",
                "Write clear, structured prompts and evaluate model output",
                &["prompting", "llm", "foundations"],
                Difficulty::Beginner,
                45,
            )
        },
        legacy(
            "2",
            "Python for AI Practitioners",
            "python-for-ai",
            "The Python you need to work with notebooks, data and model APIs",
            &["python", "foundations"],
            Difficulty::Beginner,
            90,
        ),
        Topic {
            is_featured: true,
            ..legacy(
                "3",
                "Building RAG Pipelines",
                "building-rag-pipelines",
                "Retrieval-augmented generation from chunking to evaluation",
                &["rag", "llm", "vector-search"],
                Difficulty::Intermediate,
                120,
            )
        },
        legacy(
            "4",
            "Vector Databases in Practice",
            "vector-databases",
            "Embeddings, similarity search and index tuning",
            &["vector-search", "databases"],
            Difficulty::Intermediate,
            75,
        ),
        legacy(
            "5",
            "Fine-Tuning Language Models",
            "fine-tuning-llms",
            "Dataset preparation, parameter-efficient tuning and evaluation",
            &["llm", "training"],
            Difficulty::Advanced,
            180,
        ),
        Topic {
            learning_outcomes: strings(&[
                "Design a tool-calling loop with explicit stop conditions",
                "Trace and debug multi-step agent runs",
            ]),
            ..legacy(
                "6",
                "AI Agent Architecture",
                "ai-agent-architecture",
                "Planning, tool use and memory for autonomous agents",
                &["agents", "llm"],
                Difficulty::Advanced,
                150,
            )
        },
        legacy(
            "7",
            "Deploying Models to Production",
            "mlops-deployment",
            "Serving, monitoring and rolling back machine learning models",
            &["mlops", "deployment"],
            Difficulty::Advanced,
            160,
        ),
        legacy(
            "8",
            "Responsible AI and Governance",
            "responsible-ai",
            "Bias, privacy and policy considerations for AI products",
            &["ethics", "governance"],
            Difficulty::Beginner,
            60,
        ),
    ]
}
