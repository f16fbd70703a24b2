use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use serde::Serialize;

use uuid::Uuid;

use crate::domain::{Campaign, CampaignStatus, Donation};

use super::{round_half_up, sum_amounts};

const TOP_CAMPAIGNS: usize = 5;
const LABEL_LEN: usize = 15;

/// A campaign together with the values derived from its donations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignProgress {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub raised_amount: Decimal,
    pub donor_count: usize,
    /// Whole percent of goal reached; may exceed 100
    pub progress_pct: Decimal,
    /// `progress_pct` clamped to 0..=100 for progress bars
    pub bar_width: Decimal,
    /// Completed once stored as such or once the goal is met
    pub effective_status: CampaignStatus,
}

impl CampaignProgress {
    /// Derive progress from `donations`, which may include other campaigns' donations
    pub fn new(campaign: Campaign, donations: &[Donation]) -> Self {
        let own: Vec<&Donation> = donations
            .iter()
            .filter(|d| d.campaign_id == Some(campaign.id))
            .collect();
        Self::from_own(campaign, &own)
    }

    fn from_own(campaign: Campaign, own: &[&Donation]) -> Self {
        let raised_amount = sum_amounts(own.iter().copied());
        let donor_count = own.iter().map(|d| d.donor_id).collect::<HashSet<_>>().len();
        let progress_pct = progress_pct(raised_amount, campaign.goal_amount);
        let bar_width = progress_pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        let effective_status = if campaign.status == CampaignStatus::Completed
            || (campaign.goal_amount > Decimal::ZERO && raised_amount >= campaign.goal_amount)
        {
            CampaignStatus::Completed
        } else {
            CampaignStatus::Active
        };

        Self {
            campaign,
            raised_amount,
            donor_count,
            progress_pct,
            bar_width,
            effective_status,
        }
    }

    /// Whether the goal has been met while the campaign is still stored as active
    pub fn is_newly_completed(&self) -> bool {
        self.campaign.status == CampaignStatus::Active
            && self.effective_status == CampaignStatus::Completed
    }

    /// Title shortened for chart axes
    pub fn chart_label(&self) -> String {
        let title = &self.campaign.title;
        if title.chars().count() > LABEL_LEN {
            format!("{}...", title.chars().take(LABEL_LEN).collect::<String>())
        } else {
            title.clone()
        }
    }
}

/// Whole percent of `goal` covered by `raised`; 0 when there is no goal
pub fn progress_pct(raised: Decimal, goal: Decimal) -> Decimal {
    if goal > Decimal::ZERO {
        round_half_up(raised / goal * Decimal::ONE_HUNDRED, 0)
    } else {
        Decimal::ZERO
    }
}

/// Progress for every campaign, keeping the campaigns' order
pub fn campaign_progress(campaigns: Vec<Campaign>, donations: &[Donation]) -> Vec<CampaignProgress> {
    let mut by_campaign: HashMap<Uuid, Vec<&Donation>> = HashMap::new();
    for donation in donations {
        if let Some(campaign_id) = donation.campaign_id {
            by_campaign.entry(campaign_id).or_default().push(donation);
        }
    }

    campaigns
        .into_iter()
        .map(|campaign| {
            let own = by_campaign.remove(&campaign.id).unwrap_or_default();
            CampaignProgress::from_own(campaign, &own)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignSummary {
    pub count: usize,
    pub total_raised: Decimal,
    pub total_goal: Decimal,
}

impl CampaignSummary {
    pub fn new(progress: &[CampaignProgress]) -> Self {
        Self {
            count: progress.len(),
            total_raised: progress.iter().map(|p| p.raised_amount).sum(),
            total_goal: progress.iter().map(|p| p.campaign.goal_amount).sum(),
        }
    }
}

/// A bar in the "raised vs goal" chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignBar {
    pub name: String,
    pub value: Decimal,
    pub goal: Decimal,
}

/// The five best-funded campaigns, ties kept in their original order
pub fn top_campaigns(progress: &[CampaignProgress]) -> Vec<&CampaignProgress> {
    let mut ranked: Vec<&CampaignProgress> = progress.iter().collect();
    ranked.sort_by(|a, b| b.raised_amount.cmp(&a.raised_amount));
    ranked.truncate(TOP_CAMPAIGNS);
    ranked
}

pub fn progress_bars(top: &[&CampaignProgress]) -> Vec<CampaignBar> {
    top.iter()
        .map(|p| CampaignBar {
            name: p.chart_label(),
            value: p.raised_amount,
            goal: p.campaign.goal_amount,
        })
        .collect()
}

/// Share of money raised per campaign, leaving out campaigns with nothing raised
pub fn distribution(top: &[&CampaignProgress]) -> Vec<super::Share> {
    top.iter()
        .filter(|p| p.raised_amount > Decimal::ZERO)
        .map(|p| super::Share {
            name: p.chart_label(),
            value: p.raised_amount,
        })
        .collect()
}
