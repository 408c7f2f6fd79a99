//! Troubleshooting CLI for the pantry service's external dependencies.
//!
//! Run `pantry-diagnose groq`, `pantry-diagnose vision` or
//! `pantry-diagnose system`; the exit code is non-zero when a check fails.

use clap::{Parser, Subcommand};
use pantry_service::config::PantryConfig;
use pantry_service::diagnostics::{
    hint_for, mask_secret, Diagnostics, DEFAULT_PING_MODEL, DEFAULT_VISION_PROBE_MODEL,
    KNOWN_GOOD_IMAGE,
};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "pantry-diagnose", version, about = "Check Groq, Gemini and Supabase connectivity")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send a plain text prompt to Groq.
    Groq {
        #[arg(long, default_value = DEFAULT_PING_MODEL)]
        model: String,
    },
    /// Send a known public image to a Groq vision model.
    Vision {
        #[arg(long, default_value = DEFAULT_VISION_PROBE_MODEL)]
        model: String,
        #[arg(long, default_value = KNOWN_GOOD_IMAGE)]
        image_url: String,
    },
    /// Check keys, Gemini and the Supabase REST endpoint.
    System,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match PantryConfig::load() {
        Ok(config) => config,
        Err(e) => {
            println!("❌ ERROR: failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let diagnostics = Diagnostics::new(config);

    let passed = match cli.command {
        Command::Groq { model } => check_groq(&diagnostics, &model).await,
        Command::Vision { model, image_url } => {
            check_vision(&diagnostics, &model, &image_url).await
        }
        Command::System => check_system(&diagnostics).await,
    };

    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Print the masked Groq key, or report it missing.
fn groq_key_present(diagnostics: &Diagnostics) -> bool {
    match &diagnostics.config().groq.api_key {
        Some(key) => {
            println!("✅ Key found: {}", mask_secret(key, 10));
            true
        }
        None => {
            println!("❌ ERROR: GROQ_API_KEY is missing from the environment.");
            false
        }
    }
}

async fn check_groq(diagnostics: &Diagnostics, model: &str) -> bool {
    println!("--- 🔍 DIAGNOSTIC START ---");
    if !groq_key_present(diagnostics) {
        return false;
    }

    println!("⏳ Testing Groq API connection...");
    match diagnostics.ping_groq(model).await {
        Ok(reply) => {
            println!("✅ API Response: {}", reply);
            println!("🚀 SYSTEM IS READY. If scans still fail, check the image URL.");
            true
        }
        Err(e) => {
            println!("❌ CRITICAL ERROR: {}", e);
            println!("This means the API key is invalid or Groq is down.");
            false
        }
    }
}

async fn check_vision(diagnostics: &Diagnostics, model: &str, image_url: &str) -> bool {
    println!("--- 🔍 VISION DIAGNOSTIC ---");
    if !groq_key_present(diagnostics) {
        return false;
    }

    println!("⏳ Sending test image to Groq...");
    match diagnostics.probe_vision(model, image_url).await {
        Ok(reply) => {
            println!("✅ SUCCESS! Groq replied:");
            println!("{}", reply);
            true
        }
        Err(e) => {
            println!("❌ CRITICAL FAILURE: {}", e);
            if let Some(hint) = hint_for(&e) {
                println!(">> HINT: {}", hint);
            }
            false
        }
    }
}

async fn check_system(diagnostics: &Diagnostics) -> bool {
    let config = diagnostics.config();
    let mut passed = true;

    println!("--- 🔍 SYSTEM DIAGNOSTIC ---");

    match &config.google.api_key {
        Some(key) => println!("✅ Google Key found: {}", mask_secret(key, 5)),
        None => {
            println!("❌ ERROR: GOOGLE_API_KEY is missing");
            passed = false;
        }
    }

    match &config.supabase.url {
        Some(url) => println!("✅ Supabase URL found: {}", url),
        None => {
            println!("❌ ERROR: SUPABASE_URL is missing");
            passed = false;
        }
    }

    println!("\n--- 🤖 TESTING AI CONNECTION ---");
    match diagnostics.ping_gemini(None).await {
        Ok(reply) => println!("✅ AI Response: {}", reply),
        Err(e) => {
            println!("❌ AI CRITICAL FAILURE: {}", e);
            passed = false;
        }
    }

    println!("\n--- 🗄️ TESTING DATABASE CONNECTION ---");
    match diagnostics.probe_store().await {
        Ok(_) => println!("✅ Database Connection Successful!"),
        Err(e) => {
            println!("❌ Database Error: {}", e);
            passed = false;
        }
    }

    println!("\n--- DIAGNOSTIC COMPLETE ---");
    passed
}
