//! First-run demo data.
//!
//! Seeds two demo providers and their offers so a fresh install has
//! something to browse. A marker record keeps the seed from re-appearing
//! after the user deletes the demo content.

use accounts::{AccountRegistry, UserAccount};
use marketplace::{MarketConfig, MarketStore, OfferDraft};

use crate::{JsonStore, StorageError, SEED_KEY};

const ALEX_ID: &str = "u_seed_alex";
const JO_ID: &str = "u_seed_jo";

/// Seed demo accounts and offers exactly once.
///
/// Returns whether seeding ran. Offers are only added when the catalog is
/// still empty, so a populated install never gains surprise listings.
pub fn seed_demo_data(
    files: &JsonStore,
    market: &mut MarketStore,
    registry: &mut AccountRegistry,
    config: &MarketConfig,
) -> Result<bool, StorageError> {
    let already = files.load_or(SEED_KEY, false);
    if already {
        return Ok(false);
    }
    files.save(SEED_KEY, &true)?;

    if !market.offers().is_empty() {
        return Ok(false);
    }

    tracing::info!("seeding demo accounts and offers");

    registry.insert(UserAccount {
        id: ALEX_ID.to_string(),
        email: Some("alex@seed.dev".to_string()),
        password: None, // account switcher only
        name: "Alex (DevOps)".to_string(),
        credits: 12,
        bio: "DevOps & AWS cost optimization.".to_string(),
        location: "London, UK".to_string(),
        avatar: None,
    });
    registry.insert(UserAccount {
        id: JO_ID.to_string(),
        email: Some("jo@seed.dev".to_string()),
        password: None,
        name: "Jo (Design)".to_string(),
        credits: 5,
        bio: "Brand & product design.".to_string(),
        location: "London, UK".to_string(),
        avatar: None,
    });

    market.publish_offer(
        OfferDraft {
            user_id: ALEX_ID.to_string(),
            user_name: "Alex (DevOps)".to_string(),
            title: "AWS cost review".to_string(),
            desc: "Audit bill + savings tips.".to_string(),
            category: Some("tech".to_string()),
            gbp_per_hour: 80,
        },
        config,
    );
    market.publish_offer(
        OfferDraft {
            user_id: JO_ID.to_string(),
            user_name: "Jo (Design)".to_string(),
            title: "Brand polish session".to_string(),
            desc: "1h design review & tweaks.".to_string(),
            category: Some("creative".to_string()),
            gbp_per_hour: 50,
        },
        config,
    );

    Ok(true)
}
