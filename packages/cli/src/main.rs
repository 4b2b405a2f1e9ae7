mod client;
mod search;
mod upload;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};

use client::{ApiClient, Resource, SearchParams, UploadFields};

#[derive(Parser)]
#[command(name = "library")]
#[command(version)]
#[command(about = "Search, upload and organize university course material")]
struct Cli {
    /// Base URL of the library server
    #[arg(
        long,
        global = true,
        env = "LIBRARY_SERVER",
        default_value = "http://127.0.0.1:3000"
    )]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct FilterArgs {
    /// Only this category (e.g. Notes, Books)
    #[arg(long)]
    category: Option<String>,

    /// Only this course (e.g. B.Tech)
    #[arg(long)]
    course: Option<String>,

    /// Only this specialization (e.g. CSE)
    #[arg(long)]
    specialization: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the library once and print the matches
    Search {
        /// Case-insensitive text matched against title and description
        #[arg(short, long)]
        query: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Print raw JSON instead of a listing
        #[arg(long)]
        json: bool,
    },

    /// Interactive search: each line typed becomes the new query
    Browse {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// List the categories currently in use
    Categories,

    /// Upload a PDF or image
    Upload {
        /// File to upload
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long)]
        category: String,

        #[arg(long)]
        course: Option<String>,

        #[arg(long)]
        specialization: Option<String>,
    },

    /// Manage the course taxonomy
    Courses {
        #[command(subcommand)]
        command: CourseCommands,
    },
}

#[derive(Subcommand)]
enum CourseCommands {
    /// List courses with their specializations
    List {
        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a course (no-op if it exists)
    AddCourse { name: String },
    /// Create a specialization under a course (no-op if it exists)
    AddSpecialization {
        #[arg(long)]
        course_id: i64,
        name: String,
    },
}

impl FilterArgs {
    fn into_params(self, query: Option<String>) -> SearchParams {
        SearchParams {
            query,
            category: self.category,
            course: self.course,
            specialization: self.specialization,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let client = ApiClient::new(&cli.server)?;

    match cli.command {
        Commands::Search {
            query,
            filters,
            json,
        } => {
            let resources = client.search(&filters.into_params(query))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&resources)?);
            } else {
                print_resources(&resources);
            }
        }
        Commands::Browse { filters } => {
            eprintln!("Type to search; results follow each pause. Ctrl+D to quit.");
            search::browse(
                &client,
                filters.into_params(None),
                io::BufReader::new(io::stdin()),
                |_, result| match result {
                    Ok(resources) => print_resources(resources),
                    Err(e) => eprintln!("error: {e:#}"),
                },
            )?;
        }
        Commands::Categories => {
            for category in client.categories()? {
                println!("{category}");
            }
        }
        Commands::Upload {
            file,
            title,
            description,
            category,
            course,
            specialization,
        } => {
            let fields = UploadFields {
                title,
                description,
                category,
                course,
                specialization,
            };
            let mime = upload::check_file(&file)?;
            let problems = upload::check_fields(&fields);
            if !problems.is_empty() {
                bail!("Validation failed\n  {}", problems.join("\n  "));
            }

            let resource = client.upload(&file, &mime, &fields)?;
            println!("Uploaded \"{}\"", resource.title);
            println!("  id:  {}", resource.id);
            println!("  url: {}", resource.file_url);
        }
        Commands::Courses { command } => run_courses(&client, command)?,
    }

    Ok(())
}

fn run_courses(client: &ApiClient, command: CourseCommands) -> Result<()> {
    match command {
        CourseCommands::List { json } => {
            let courses = client.courses()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&courses)?);
                return Ok(());
            }
            for course in courses {
                println!("{} (#{})", course.name, course.id);
                for spec in course.specializations {
                    println!("  - {} (#{})", spec.name, spec.id);
                }
            }
        }
        CourseCommands::AddCourse { name } => {
            let course = client.add_course(&name)?;
            println!("{} (#{})", course.name, course.id);
        }
        CourseCommands::AddSpecialization { course_id, name } => {
            let spec = client.add_specialization(course_id, &name)?;
            println!("{} (#{}) under course #{}", spec.name, spec.id, spec.course_id);
        }
    }
    Ok(())
}

fn print_resources(resources: &[Resource]) {
    let mut out = io::stdout().lock();
    if resources.is_empty() {
        let _ = writeln!(out, "No resources found.");
        return;
    }
    for r in resources {
        let tags: Vec<&str> = [r.course.as_deref(), r.specialization.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        let _ = writeln!(out, "{}  [{}] {}", r.title, r.category, tags.join(" / "));
        if let Some(desc) = &r.description {
            let _ = writeln!(out, "    {desc}");
        }
        let _ = writeln!(out, "    {}", r.file_url);
    }
}
