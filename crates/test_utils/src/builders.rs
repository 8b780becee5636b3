//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::NaiveDate;
use core_kernel::{AssetId, LossEventId, Money, PhotoId, PropertyId, UserId};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;

use domain_loss::{
    LossEvent, LossEventStatus, LossEventType, NewLossEvent, Recipient, ReminderThreshold,
};
use domain_proof::{CatalogAsset, CatalogPhoto, LossEventContext};

use crate::fixtures::{IdFixtures, MoneyFixtures, StringFixtures, TemporalFixtures};

/// Builder for reported loss events
///
/// Builds through [`LossEvent::report`] so the filing deadline is always the
/// one the domain derives, then applies status and reminder adjustments.
pub struct LossEventBuilder {
    input: NewLossEvent,
    fired: Vec<ReminderThreshold>,
    closed: bool,
}

impl Default for LossEventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LossEventBuilder {
    /// Creates a new builder on the canonical discovery timeline
    pub fn new() -> Self {
        Self {
            input: NewLossEvent {
                user_id: IdFixtures::user_id(),
                property_id: Some(IdFixtures::property_id()),
                event_type: LossEventType::Theft,
                event_date: TemporalFixtures::event_date(),
                discovery_date: TemporalFixtures::discovery_date(),
                description: StringFixtures::description().to_string(),
                police_report_number: Some(StringFixtures::police_report_number().to_string()),
                fire_report_number: None,
                estimated_loss: Some(MoneyFixtures::usd_laptop()),
            },
            fired: Vec::new(),
            closed: false,
        }
    }

    /// Sets the owning user
    pub fn with_user_id(mut self, id: UserId) -> Self {
        self.input.user_id = id;
        self
    }

    /// Sets the property, or clears it
    pub fn with_property_id(mut self, id: Option<PropertyId>) -> Self {
        self.input.property_id = id;
        self
    }

    /// Sets the incident category
    pub fn with_event_type(mut self, event_type: LossEventType) -> Self {
        self.input.event_type = event_type;
        self
    }

    /// Sets the incident date
    pub fn with_event_date(mut self, date: NaiveDate) -> Self {
        self.input.event_date = date;
        self
    }

    /// Sets the discovery date, which moves the filing deadline with it
    pub fn with_discovery_date(mut self, date: NaiveDate) -> Self {
        self.input.discovery_date = date;
        self
    }

    /// Sets the loss description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.input.description = description.into();
        self
    }

    /// Sets the estimated loss, or clears it
    pub fn with_estimated_loss(mut self, loss: Option<Money>) -> Self {
        self.input.estimated_loss = loss;
        self
    }

    /// Records a reminder threshold as already fired
    pub fn with_fired(mut self, threshold: ReminderThreshold) -> Self {
        self.fired.push(threshold);
        self
    }

    /// Builds the event in closed status
    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    /// Returns the raw input, for tests that exercise reporting itself
    pub fn build_input(self) -> NewLossEvent {
        self.input
    }

    /// Builds the loss event
    pub fn build(self) -> LossEvent {
        let mut event =
            LossEvent::report(self.input).expect("builder produced an invalid loss event");
        if !self.fired.is_empty() {
            event.mark_reminded(&self.fired);
        }
        if self.closed {
            event.status = LossEventStatus::Closed;
        }
        event
    }
}

/// Builder for the loss event slice that proof of loss submission reads
pub struct LossEventContextBuilder {
    id: LossEventId,
    user_id: UserId,
    property_id: Option<PropertyId>,
    event_label: String,
    event_date: NaiveDate,
    discovery_date: NaiveDate,
    filing_deadline: NaiveDate,
}

impl Default for LossEventContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LossEventContextBuilder {
    /// Creates a new builder on the canonical discovery timeline
    pub fn new() -> Self {
        Self {
            id: IdFixtures::loss_event_id(),
            user_id: IdFixtures::user_id(),
            property_id: Some(IdFixtures::property_id()),
            event_label: "Theft".to_string(),
            event_date: TemporalFixtures::event_date(),
            discovery_date: TemporalFixtures::discovery_date(),
            filing_deadline: TemporalFixtures::filing_deadline(),
        }
    }

    /// Sets the event ID
    pub fn with_id(mut self, id: LossEventId) -> Self {
        self.id = id;
        self
    }

    /// Sets the owning user
    pub fn with_user_id(mut self, id: UserId) -> Self {
        self.user_id = id;
        self
    }

    /// Sets the property, or clears it
    pub fn with_property_id(mut self, id: Option<PropertyId>) -> Self {
        self.property_id = id;
        self
    }

    /// Sets the incident label
    pub fn with_event_label(mut self, label: impl Into<String>) -> Self {
        self.event_label = label.into();
        self
    }

    /// Sets the filing deadline
    pub fn with_filing_deadline(mut self, deadline: NaiveDate) -> Self {
        self.filing_deadline = deadline;
        self
    }

    /// Builds the context
    pub fn build(self) -> LossEventContext {
        LossEventContext {
            id: self.id,
            user_id: self.user_id,
            property_id: self.property_id,
            event_label: self.event_label,
            event_date: self.event_date,
            discovery_date: self.discovery_date,
            filing_deadline: self.filing_deadline,
        }
    }
}

/// Builder for documented assets as the inventory catalog returns them
pub struct CatalogAssetBuilder {
    id: AssetId,
    name: String,
    category: Option<String>,
    estimated_value: Option<Money>,
    photos: Vec<CatalogPhoto>,
}

impl Default for CatalogAssetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogAssetBuilder {
    /// Creates a new builder with a typical electronics asset
    pub fn new() -> Self {
        Self {
            id: AssetId::new(),
            name: "Laptop".to_string(),
            category: Some("Electronics".to_string()),
            estimated_value: Some(MoneyFixtures::usd_laptop()),
            photos: Vec::new(),
        }
    }

    /// Sets the asset ID
    pub fn with_id(mut self, id: AssetId) -> Self {
        self.id = id;
        self
    }

    /// Sets the asset name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the category, or clears it
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Sets the documented value, or clears it
    pub fn with_value(mut self, value: Option<Money>) -> Self {
        self.estimated_value = value;
        self
    }

    /// Attaches the given number of photo references
    pub fn with_photo_count(mut self, count: usize) -> Self {
        self.photos = (0..count)
            .map(|n| CatalogPhoto {
                id: PhotoId::new(),
                url: format!("https://cdn.claimready.io/photos/asset-{n}.jpg"),
            })
            .collect();
        self
    }

    /// Builds the catalog asset
    pub fn build(self) -> CatalogAsset {
        CatalogAsset {
            id: self.id,
            name: self.name,
            category: self.category,
            estimated_value: self.estimated_value,
            photos: self.photos,
        }
    }
}

/// A randomized recipient for mailer tests that want unique inboxes
pub fn random_recipient() -> Recipient {
    Recipient::with_name(SafeEmail().fake::<String>(), Name().fake::<String>())
}
