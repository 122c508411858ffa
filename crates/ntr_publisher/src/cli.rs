use clap::{Args, Subcommand};
use ntr_core::{Error, Result};
use ntr_inference::ArticleGenerator;
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info};

use crate::publisher::BatchPublisher;

/// Batch interval such as `90`, `30m`, `1h15m30s` or `1d`. A bare number is
/// seconds. Zero is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

fn unit_seconds(unit: char) -> Option<u64> {
    match unit {
        's' => Some(1),
        'm' => Some(60),
        'h' => Some(3_600),
        'd' => Some(86_400),
        _ => None,
    }
}

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let overflow = || format!("Duration is too long: {}", s.trim());
        let mut total: u64 = 0;
        let mut digits = String::new();
        let mut parts = 0;

        // The end of input flushes a bare number as seconds.
        for c in s.trim().chars().map(Some).chain(std::iter::once(None)) {
            match c {
                Some(c) if c.is_ascii_digit() => {
                    digits.push(c);
                    continue;
                }
                Some(c) if c.is_whitespace() => continue,
                None if digits.is_empty() => break,
                _ => {}
            }
            let c = c.unwrap_or('s');
            if digits.is_empty() {
                return Err(format!("Expected a number before '{}'", c));
            }
            let scale = unit_seconds(c).ok_or_else(|| format!("Invalid duration unit: {}", c))?;
            let value: u64 = digits.parse().map_err(|_| overflow())?;
            total = value
                .checked_mul(scale)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(overflow)?;
            digits.clear();
            parts += 1;
        }

        if parts == 0 {
            return Err("Duration must include a number".to_string());
        }
        if total == 0 {
            return Err("Interval must be longer than zero".to_string());
        }
        Ok(HumanDuration(Duration::from_secs(total)))
    }
}

#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    #[command(subcommand)]
    pub command: PublishCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PublishCommands {
    /// Generate and store one article per category from today's trending topics
    Publish {
        /// Keep running, publishing a batch every interval (e.g. 1h, 30m, 1h15m30s)
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    /// Generate a single article from a prompt and print it without saving
    Generate {
        prompt: String,
    },
    /// Print the current trending topic for each category
    Topics,
}

pub async fn handle_command(
    args: PublishArgs,
    generator: &ArticleGenerator,
    publisher: &BatchPublisher,
) -> Result<()> {
    match args.command {
        PublishCommands::Publish { interval: None } => {
            let report = publisher.run().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        PublishCommands::Publish {
            interval: Some(HumanDuration(interval)),
        } => {
            info!("Publishing every {}s", interval.as_secs());
            loop {
                match publisher.run().await {
                    Ok(report) => info!("{}", report.message),
                    Err(e) => error!("Batch failed: {}", e),
                }
                info!("Waiting {}s before next batch", interval.as_secs());
                tokio::time::sleep(interval).await;
            }
        }
        PublishCommands::Generate { prompt } => {
            let data = generator.generate_internal(&prompt).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        PublishCommands::Topics => {
            let topics = generator
                .fetch_trending_topics()
                .await
                .ok_or_else(|| Error::Inference(crate::publisher::TOPICS_UNAVAILABLE_MESSAGE.to_string()))?;
            for (category, topic) in topics.iter() {
                println!("{:<8} {}", category.name(), topic);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_duration() {
        assert_eq!("90".parse::<HumanDuration>().unwrap().0, Duration::from_secs(90));
        assert_eq!("30m".parse::<HumanDuration>().unwrap().0, Duration::from_secs(1800));
        assert_eq!(
            "1h15m30s".parse::<HumanDuration>().unwrap().0,
            Duration::from_secs(4530)
        );
        assert_eq!("1d".parse::<HumanDuration>().unwrap().0, Duration::from_secs(86400));
        assert!("".parse::<HumanDuration>().is_err());
        assert!("5w".parse::<HumanDuration>().is_err());
        assert!("h".parse::<HumanDuration>().is_err());
        assert!("1hs".parse::<HumanDuration>().is_err());
    }

    #[test]
    fn test_human_duration_rejects_zero() {
        assert!("0".parse::<HumanDuration>().is_err());
        assert!("0s".parse::<HumanDuration>().is_err());
        assert!("0h0m".parse::<HumanDuration>().is_err());
        assert_eq!("0h1s".parse::<HumanDuration>().unwrap().0, Duration::from_secs(1));
    }

    #[test]
    fn test_human_duration_overflow_is_an_error() {
        let err = "999999999999999999d".parse::<HumanDuration>().unwrap_err();
        assert!(err.contains("too long"));
        assert!("99999999999999999999999".parse::<HumanDuration>().is_err());
        assert!(format!("{}s1s", u64::MAX).parse::<HumanDuration>().is_err());
    }
}
