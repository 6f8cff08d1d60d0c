use quotedesk_db::{open_store, DemoDataset, SeedResult};
use tracing::info;

use crate::commands::{
    load_config, runtime, CommandResult, EXIT_MIGRATION, EXIT_SEED_VERIFICATION, EXIT_STORE,
};

pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match runtime("seed") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let store = open_store(&config.store)
            .await
            .map_err(|error| ("store_open", error.to_string(), EXIT_STORE))?;

        let seeded = DemoDataset::load(store.clone())
            .await
            .map_err(|error| ("seed_execution", error.to_string(), EXIT_MIGRATION))?;

        let verification = DemoDataset::verify(store)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), EXIT_SEED_VERIFICATION))?;

        let outcome: Result<SeedResult, (&'static str, String, u8)> = if verification.all_present {
            Ok(seeded)
        } else {
            let message = verification_message(&failed_checks(&verification.checks));
            Err(("seed_verification", message, EXIT_SEED_VERIFICATION))
        };
        outcome
    });

    match result {
        Ok(seeded) => {
            info!(
                event_name = "cli.seed.loaded",
                change_count = seeded.changes,
                "demo dataset loaded"
            );
            CommandResult::report("seed", summary(&seeded), &SeedReport::from(&seeded))
        }
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

#[derive(serde::Serialize)]
struct SeedReport {
    products: usize,
    customers: usize,
    sales_persons: usize,
    quotations: usize,
    challans: usize,
}

impl From<&SeedResult> for SeedReport {
    fn from(seeded: &SeedResult) -> Self {
        Self {
            products: seeded.products,
            customers: seeded.customers,
            sales_persons: seeded.sales_persons,
            quotations: seeded.quotations,
            challans: seeded.challans,
        }
    }
}

fn summary(seeded: &SeedResult) -> String {
    format!(
        "demo dataset ready: {} products, {} customers, {} sales persons, {} quotations, \
         {} challans",
        seeded.products,
        seeded.customers,
        seeded.sales_persons,
        seeded.quotations,
        seeded.challans
    )
}

fn failed_checks(checks: &[(&'static str, bool)]) -> Vec<&'static str> {
    checks.iter().filter_map(|(check, passed)| (!passed).then_some(*check)).collect()
}

fn verification_message(failed_checks: &[&str]) -> String {
    if failed_checks.is_empty() {
        "Some seed data failed to load".to_string()
    } else {
        format!("Seed verification failed for checks: {}", failed_checks.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::{failed_checks, verification_message};

    #[test]
    fn verification_error_message_targets_failed_checks() {
        let checks = [("product", true), ("quotation-status", false), ("challan", false)];

        let message = verification_message(&failed_checks(&checks));

        assert_eq!(message, "Seed verification failed for checks: quotation-status, challan");
    }

    #[test]
    fn verification_error_message_falls_back_to_generic_when_no_labels() {
        let checks = [("product", true), ("customers", true)];

        let message = verification_message(&failed_checks(&checks));

        assert_eq!(message, "Some seed data failed to load");
    }
}
