//! Rendering of command results on stdout.
//!
//! Logs go to stderr through `tracing`; only results are printed here so
//! `--json` output can be piped.

#![allow(clippy::print_stdout)]

use jikoni_client::models::{AdminProfile, DashboardStats, Health, Message, Product};
use jikoni_core::Category;
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    fn json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| CliError::Other(format!("cannot render output: {e}")))?;
        println!("{text}");
        Ok(())
    }

    pub fn line(self, text: &str) {
        if !self.json {
            println!("{text}");
        }
    }

    pub fn products(self, products: &[Product]) -> Result<(), CliError> {
        if self.json {
            return Self::json(products);
        }
        if products.is_empty() {
            println!("No products.");
            return Ok(());
        }
        println!("{:>5}  {:<32} {:<10} {:>12}  {}", "ID", "NAME", "CATEGORY", "PRICE", "FEATURED");
        for p in products {
            println!(
                "{:>5}  {:<32} {:<10} {:>12}  {}",
                p.id.as_i64(),
                truncate(&p.name, 32),
                p.category.as_str(),
                p.price.map_or_else(|| "N/A".to_owned(), |price| format!("KSh {price}")),
                if p.featured { "yes" } else { "" },
            );
        }
        Ok(())
    }

    pub fn product(self, product: &Product) -> Result<(), CliError> {
        if self.json {
            return Self::json(product);
        }
        println!("#{} {}", product.id, product.name);
        println!("  Category:    {}", product.category);
        println!(
            "  Price:       {}",
            product
                .price
                .map_or_else(|| "N/A".to_owned(), |p| format!("KSh {p}"))
        );
        println!("  Featured:    {}", product.featured);
        if let Some(description) = &product.description {
            println!("  Description: {description}");
        }
        if let Some(image) = &product.image_url {
            println!("  Image:       {image}");
        }
        if let Some(created) = product.created_at {
            println!("  Created:     {created}");
        }
        Ok(())
    }

    pub fn messages(self, messages: &[Message]) -> Result<(), CliError> {
        if self.json {
            return Self::json(messages);
        }
        if messages.is_empty() {
            println!("No messages.");
            return Ok(());
        }
        println!("{:>5}  {:<8} {:<24} {:<28} {}", "ID", "STATUS", "NAME", "EMAIL", "RECEIVED");
        for m in messages {
            println!(
                "{:>5}  {:<8} {:<24} {:<28} {}",
                m.id.as_i64(),
                m.status.as_str(),
                truncate(&m.name, 24),
                truncate(m.email.as_str(), 28),
                m.created_at.map(|t| t.to_string()).unwrap_or_default(),
            );
        }
        Ok(())
    }

    pub fn message(self, message: &Message) -> Result<(), CliError> {
        if self.json {
            return Self::json(message);
        }
        println!("#{} from {} <{}> [{}]", message.id, message.name, message.email, message.status);
        if let Some(phone) = &message.phone {
            println!("Phone: {phone}");
        }
        if let Some(created) = message.created_at {
            println!("Received: {created}");
        }
        println!();
        println!("{}", message.message);
        Ok(())
    }

    pub fn stats(self, stats: &DashboardStats) -> Result<(), CliError> {
        if self.json {
            return Self::json(stats);
        }
        let counts = stats.stats;
        println!("Products:          {}", counts.total_products);
        println!("Featured products: {}", counts.featured_products);
        println!("Messages:          {}", counts.total_messages);
        println!("New messages:      {}", counts.new_messages);

        if !stats.recent_products.is_empty() {
            println!();
            println!("Recent products:");
            for p in &stats.recent_products {
                let category = p.category.map(|c| c.to_string()).unwrap_or_default();
                println!("  #{} {} {}", p.id, p.name, category);
            }
        }
        if !stats.recent_messages.is_empty() {
            println!();
            println!("Recent messages:");
            for m in &stats.recent_messages {
                println!("  #{} {} [{}]", m.id, m.name, m.status);
            }
        }
        Ok(())
    }

    pub fn categories(self, categories: &[Category]) -> Result<(), CliError> {
        if self.json {
            return Self::json(categories);
        }
        for category in categories {
            println!("{category}");
        }
        Ok(())
    }

    pub fn profile(self, profile: &AdminProfile) -> Result<(), CliError> {
        if self.json {
            return Self::json(profile);
        }
        match &profile.email {
            Some(email) => println!("{} <{email}>", profile.username),
            None => println!("{}", profile.username),
        }
        Ok(())
    }

    pub fn health(self, health: &Health) -> Result<(), CliError> {
        if self.json {
            return Self::json(health);
        }
        match &health.message {
            Some(message) => println!("{}: {message}", health.status),
            None => println!("{}", health.status),
        }
        Ok(())
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Kitchen", 10), "Kitchen");
        assert_eq!(truncate("Floor-to-ceiling wardrobe", 10), "Floor-to-…");
        assert_eq!(truncate("Floor-to-…", 10).chars().count(), 10);
    }
}
