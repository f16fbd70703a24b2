use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use chrono::Utc;

use secrecy::Secret;

use uuid::Uuid;

use donor_desk::domain::{
    Campaign, CampaignStatus, CommunicationRecord, Direction, Donation, Donor, EmailAddress,
    NewCampaign, NewCommunication, NewDonation, NewDonor, OrgSettings, OrgSettingsUpdate,
};
use donor_desk::error::{Error, Result};
use donor_desk::repo::{
    CampaignRepo, CommunicationRepo, DonationRepo, DonorRepo, NewUser, Repositories,
    SettingsRepo, UserCredentials, UserRepo,
};

/// Repositories held in memory, one instance per spawned app
#[derive(Default)]
pub struct MemoryStore {
    donors: Mutex<Vec<Donor>>,
    donations: Mutex<Vec<Donation>>,
    campaigns: Mutex<Vec<Campaign>>,
    communications: Mutex<Vec<CommunicationRecord>>,
    settings: Mutex<Option<OrgSettings>>,
    users: Mutex<Vec<(Uuid, EmailAddress, String)>>,
}

impl MemoryStore {
    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            donors: self.clone(),
            donations: self.clone(),
            campaigns: self.clone(),
            communications: self.clone(),
            settings: self.clone(),
            users: self.clone(),
        }
    }

    pub fn communications(&self) -> Vec<CommunicationRecord> {
        self.communications.lock().unwrap().clone()
    }

    pub fn donation_count(&self) -> usize {
        self.donations.lock().unwrap().len()
    }

    pub fn mark_completed(&self, campaign_id: Uuid) {
        for campaign in self.campaigns.lock().unwrap().iter_mut() {
            if campaign.id == campaign_id {
                campaign.status = CampaignStatus::Completed;
            }
        }
    }
}

/// The row the settings migration seeds
fn seeded_settings() -> OrgSettings {
    OrgSettings {
        id: Uuid::new_v4(),
        org_name: "My Charitable Trust".into(),
        org_email: None,
        org_phone: None,
        org_address: None,
        website: None,
        upi_id: None,
        razorpay_key: None,
        notifications_enabled: true,
        updated_at: Utc::now(),
    }
}

fn to_donor(id: Uuid, donor: &NewDonor, created_at: chrono::DateTime<Utc>) -> Donor {
    Donor {
        id,
        name: donor.name.as_ref().to_string(),
        email: Some(donor.email.as_ref().to_string()),
        phone: Some(donor.phone.as_ref().to_string()),
        donor_type: donor.donor_type,
        status: donor.status,
        birth_date: Some(donor.birth_date),
        anniversary_date: donor.anniversary_date,
        social_media_handle: donor.social_media_handle.clone(),
        memorial_dates: donor.memorial_dates.clone(),
        created_at,
    }
}

#[async_trait]
impl DonorRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<Donor>> {
        let mut donors = self.donors.lock().unwrap().clone();
        donors.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(donors)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Donor>> {
        Ok(self.donors.lock().unwrap().iter().find(|d| d.id == id).cloned())
    }

    async fn insert(&self, new_donor: &NewDonor) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.donors
            .lock()
            .unwrap()
            .push(to_donor(id, new_donor, Utc::now()));
        Ok(id)
    }

    async fn update(&self, id: Uuid, donor: &NewDonor) -> Result<()> {
        let mut donors = self.donors.lock().unwrap();
        let stored = donors
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(Error::NotFound { entity: "Donor", id })?;
        *stored = to_donor(id, donor, stored.created_at);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut donors = self.donors.lock().unwrap();
        let before = donors.len();
        donors.retain(|d| d.id != id);
        if donors.len() == before {
            return Err(Error::NotFound { entity: "Donor", id });
        }
        self.donations.lock().unwrap().retain(|d| d.donor_id != id);
        self.communications
            .lock()
            .unwrap()
            .retain(|c| c.donor_id != id);
        Ok(())
    }
}

#[async_trait]
impl DonationRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<Donation>> {
        let mut donations = self.donations.lock().unwrap().clone();
        donations.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(donations)
    }

    async fn list_by_campaign(&self, campaign_id: Uuid) -> Result<Vec<Donation>> {
        let donations = DonationRepo::list(self).await?;
        Ok(donations
            .into_iter()
            .filter(|d| d.campaign_id == Some(campaign_id))
            .collect())
    }

    async fn list_by_donor(&self, donor_id: Uuid) -> Result<Vec<Donation>> {
        let donations = DonationRepo::list(self).await?;
        Ok(donations
            .into_iter()
            .filter(|d| d.donor_id == donor_id)
            .collect())
    }

    async fn insert(&self, new_donation: &NewDonation) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.donations.lock().unwrap().push(Donation {
            id,
            donor_id: new_donation.donor_id,
            campaign_id: new_donation.campaign_id,
            amount: new_donation.amount,
            kind: new_donation.kind.clone(),
            date: new_donation.date,
        });
        Ok(id)
    }
}

#[async_trait]
impl CampaignRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<Campaign>> {
        let mut campaigns = self.campaigns.lock().unwrap().clone();
        campaigns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(campaigns)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Campaign>> {
        Ok(self
            .campaigns
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn insert(&self, new_campaign: &NewCampaign) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.campaigns.lock().unwrap().push(Campaign {
            id,
            title: new_campaign.title.clone(),
            description: new_campaign.description.clone(),
            goal_amount: new_campaign.goal_amount,
            deadline: new_campaign.deadline,
            status: CampaignStatus::Active,
            created_at: Utc::now(),
        });
        Ok(id)
    }
}

#[async_trait]
impl CommunicationRepo for MemoryStore {
    async fn insert(&self, communication: &NewCommunication) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.communications.lock().unwrap().push(CommunicationRecord {
            id,
            donor_id: communication.donor_id,
            channel: communication.channel,
            subject: communication.subject.clone(),
            content: communication.content.clone(),
            status: communication.status,
            direction: Direction::Outbound,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list_by_donor(&self, donor_id: Uuid) -> Result<Vec<CommunicationRecord>> {
        let mut records: Vec<CommunicationRecord> = self
            .communications
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.donor_id == donor_id)
            .cloned()
            .collect();
        records.reverse();
        Ok(records)
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn insert(&self, new_user: &NewUser) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.users.lock().unwrap().push((
            id,
            new_user.email.clone(),
            new_user.password_hash.clone(),
        ));
        Ok(id)
    }

    async fn fetch_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(_, stored, _)| stored == email)
            .map(|(id, _, hash)| UserCredentials {
                id: *id,
                password_hash: Secret::new(hash.clone()),
            }))
    }
}

#[async_trait]
impl SettingsRepo for MemoryStore {
    async fn fetch(&self) -> Result<Option<OrgSettings>> {
        let mut settings = self.settings.lock().unwrap();
        Ok(Some(settings.get_or_insert_with(seeded_settings).clone()))
    }

    async fn update(&self, update: &OrgSettingsUpdate) -> Result<OrgSettings> {
        let mut settings = self.settings.lock().unwrap();
        let stored = settings.get_or_insert_with(seeded_settings);
        *stored = OrgSettings {
            id: stored.id,
            org_name: update.org_name.clone(),
            org_email: update.org_email.as_ref().map(|e| e.as_ref().to_string()),
            org_phone: update.org_phone.clone(),
            org_address: update.org_address.clone(),
            website: update.website.as_ref().map(|url| url.to_string()),
            upi_id: update.upi_id.clone(),
            razorpay_key: update.razorpay_key.clone(),
            notifications_enabled: update.notifications_enabled,
            updated_at: Utc::now(),
        };
        Ok(stored.clone())
    }
}
