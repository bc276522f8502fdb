use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use repo_tree::api::GitHubClient;
use repo_tree::config::Args;
use repo_tree::display::print_tree;
use repo_tree::logging::init_logging;
use repo_tree::reference::resolve;
use repo_tree::Result;

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = init_logging(&args.log_level) {
        eprintln!("Error: {}", err);
        return ExitCode::FAILURE;
    }

    let client = match GitHubClient::new(args.client_config()) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("Error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match args.repo.as_deref() {
        Some(repo) => match fetch_and_print(&client, &args.web_host, repo) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: {}", err);
                ExitCode::FAILURE
            }
        },
        None => prompt_loop(&client, &args.web_host),
    }
}

fn fetch_and_print(client: &GitHubClient, web_host: &str, input: &str) -> Result<()> {
    let repo = resolve(input, web_host)?;
    let tree = client.fetch_tree(&repo)?;
    print_tree(&tree)?;
    Ok(())
}

/// Prompts until one repository has been printed or stdin is closed.
fn prompt_loop(client: &GitHubClient, web_host: &str) -> ExitCode {
    let mut input = String::new();

    loop {
        print!("Enter the GitHub repository URL or owner/repo: ");
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }
        input.clear();
        match io::stdin().read_line(&mut input) {
            Ok(0) => return ExitCode::SUCCESS,
            Ok(_) => {}
            Err(err) => {
                eprintln!("An unexpected error occurred: {}", err);
                return ExitCode::FAILURE;
            }
        }

        let repo = input.trim();
        if repo.is_empty() {
            println!("Repository URL cannot be empty.");
            continue;
        }

        match fetch_and_print(client, web_host, repo) {
            Ok(()) => return ExitCode::SUCCESS,
            Err(err) if err.is_unexpected() => println!("An unexpected error occurred: {}", err),
            Err(err) => println!("Error: {}", err),
        }
    }
}
