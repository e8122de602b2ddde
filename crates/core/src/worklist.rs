//! In-memory collection of triage encounters.
//!
//! The worklist owns its records and hands out identifiers from a single generator, so
//! record ids are strictly increasing in opening order.

use crate::config::TriageConfig;
use crate::record::{Conclusion, TriageRecord, TriageStatus};
use crate::vitals::VitalsUpdate;
use crate::wait_policy::WaitPolicy;
use crate::{TriageError, TriageResult};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use triage_types::NonEmptyText;
use triage_uuid::{PatientId, TriageId, TriageIdGenerator};

#[derive(Debug)]
pub struct Worklist {
    cfg: Arc<TriageConfig>,
    ids: TriageIdGenerator,
    records: BTreeMap<TriageId, TriageRecord>,
}

impl Worklist {
    pub fn new(cfg: Arc<TriageConfig>) -> Self {
        Self {
            cfg,
            ids: TriageIdGenerator::new(),
            records: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &TriageConfig {
        &self.cfg
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Opens a pending encounter for a patient pulled in from the waiting room.
    pub fn open(
        &mut self,
        patient_id: PatientId,
        patient_name: NonEmptyText,
        now: DateTime<Utc>,
    ) -> TriageId {
        let id = self.ids.next_id_at(now);
        let record = TriageRecord::with_id(id.clone(), patient_id, patient_name);
        self.records.insert(id.clone(), record);
        id
    }

    /// Adds an existing record, for example one loaded from storage.
    ///
    /// Ids issued afterwards sort after the newest record held.
    pub fn insert(&mut self, record: TriageRecord) -> TriageResult<()> {
        let id = record.id().clone();
        if self.records.contains_key(&id) {
            return Err(TriageError::InvalidInput(format!(
                "triage record {id} is already on the worklist"
            )));
        }
        if self.records.keys().next_back().map_or(true, |newest| &id > newest) {
            self.ids = TriageIdGenerator::resume_after(id.clone());
        }
        self.records.insert(id, record);
        Ok(())
    }

    pub fn get(&self, id: &TriageId) -> TriageResult<&TriageRecord> {
        self.records
            .get(id)
            .ok_or_else(|| TriageError::RecordNotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &TriageId) -> TriageResult<&mut TriageRecord> {
        self.records
            .get_mut(id)
            .ok_or_else(|| TriageError::RecordNotFound(id.to_string()))
    }

    pub fn update_vitals(&mut self, id: &TriageId, update: &VitalsUpdate) -> TriageResult<()> {
        self.get_mut(id)?.update_vitals(update)
    }

    pub fn add_symptom(&mut self, id: &TriageId, label: &str) -> TriageResult<bool> {
        self.get_mut(id)?.add_symptom(label)
    }

    pub fn set_chief_complaint(&mut self, id: &TriageId, complaint: &str) -> TriageResult<()> {
        self.get_mut(id)?.set_chief_complaint(complaint)
    }

    /// Concludes a record using the worklist's configuration.
    pub fn conclude(
        &mut self,
        id: &TriageId,
        operator_id: &str,
        now: DateTime<Utc>,
    ) -> TriageResult<&Conclusion> {
        let cfg = Arc::clone(&self.cfg);
        self.get_mut(id)?.conclude_with(operator_id, &cfg, now)
    }

    /// Records still in intake, oldest first.
    pub fn pending(&self) -> Vec<&TriageRecord> {
        self.records
            .values()
            .filter(|r| r.status() == TriageStatus::Pending)
            .collect()
    }

    /// Concluded records in the order they should be seen.
    pub fn queue(&self) -> Vec<&TriageRecord> {
        let mut concluded: Vec<&TriageRecord> = self
            .records
            .values()
            .filter(|r| r.status() == TriageStatus::Concluded)
            .collect();
        WaitPolicy::sort_worklist(&mut concluded);
        concluded
    }

    /// Concluded records whose wait bound has passed at `now`, in queue order.
    pub fn overdue(&self, now: DateTime<Utc>) -> Vec<&TriageRecord> {
        self.queue()
            .into_iter()
            .filter(|r| r.is_overdue(now))
            .collect()
    }

    /// Removes a record, for example once the patient has been seen and the record archived.
    pub fn remove(&mut self, id: &TriageId) -> TriageResult<TriageRecord> {
        self.records
            .remove(id)
            .ok_or_else(|| TriageError::RecordNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissingVitalsPolicy;
    use crate::tier::RiskTier;
    use crate::vitals::Consciousness;
    use chrono::{Duration, TimeZone};

    fn t(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn name(s: &str) -> NonEmptyText {
        NonEmptyText::new(s).unwrap()
    }

    fn worklist() -> Worklist {
        Worklist::new(Arc::new(TriageConfig::default()))
    }

    #[test]
    fn open_issues_increasing_ids() {
        let mut list = worklist();
        let a = list.open(PatientId::new(), name("A"), t(0));
        let b = list.open(PatientId::new(), name("B"), t(0));
        assert!(a < b);
        assert_eq!(list.pending().len(), 2);
        assert_eq!(list.pending()[0].id(), &a);
    }

    #[test]
    fn queue_orders_by_priority_then_conclusion_time() {
        let mut list = worklist();
        let green = list.open(PatientId::new(), name("Green"), t(0));
        let red = list.open(PatientId::new(), name("Red"), t(1));
        let yellow_late = list.open(PatientId::new(), name("Yellow late"), t(2));
        let yellow_early = list.open(PatientId::new(), name("Yellow early"), t(3));
        let pending = list.open(PatientId::new(), name("Pending"), t(4));

        list.update_vitals(&green, &VitalsUpdate::new().pain_score(2)).unwrap();
        list.update_vitals(&red, &VitalsUpdate::new().consciousness(Consciousness::Unresponsive))
            .unwrap();
        list.update_vitals(&yellow_late, &VitalsUpdate::new().temperature(38.5)).unwrap();
        list.update_vitals(&yellow_early, &VitalsUpdate::new().pain_score(5)).unwrap();

        list.conclude(&green, "op", t(5)).unwrap();
        list.conclude(&yellow_late, "op", t(7)).unwrap();
        list.conclude(&yellow_early, "op", t(6)).unwrap();
        list.conclude(&red, "op", t(8)).unwrap();

        let order: Vec<&TriageId> = list.queue().into_iter().map(TriageRecord::id).collect();
        assert_eq!(order, vec![&red, &yellow_early, &yellow_late, &green]);
        assert_eq!(list.pending().len(), 1);
        assert_eq!(list.pending()[0].id(), &pending);
    }

    #[test]
    fn overdue_lists_records_past_their_bound() {
        let mut list = worklist();
        let red = list.open(PatientId::new(), name("Red"), t(0));
        let blue = list.open(PatientId::new(), name("Blue"), t(0));
        list.update_vitals(&red, &VitalsUpdate::new().oxygen_saturation(80)).unwrap();
        list.conclude(&red, "op", t(0)).unwrap();
        list.conclude(&blue, "op", t(0)).unwrap();

        assert!(list.overdue(t(0)).is_empty());
        let overdue: Vec<RiskTier> = list.overdue(t(30)).iter().filter_map(|r| r.tier()).collect();
        assert_eq!(overdue, vec![RiskTier::Red]);
        assert_eq!(list.overdue(t(241)).len(), 2);
    }

    #[test]
    fn conclude_uses_worklist_config() {
        let mut list = Worklist::new(Arc::new(TriageConfig::new(MissingVitalsPolicy::Require)));
        let id = list.open(PatientId::new(), name("A"), t(0));
        assert!(matches!(
            list.conclude(&id, "op", t(1)),
            Err(TriageError::MissingVitals(_))
        ));
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut list = worklist();
        let stray = TriageId::generate(None);
        assert!(matches!(list.get(&stray), Err(TriageError::RecordNotFound(_))));
        assert!(matches!(
            list.conclude(&stray, "op", t(0)),
            Err(TriageError::RecordNotFound(_))
        ));
        assert!(list.remove(&stray).is_err());
    }

    #[test]
    fn insert_rejects_duplicates_and_advances_generator() {
        let mut list = worklist();
        let future = TriageId::generate_at(t(600), None);
        let record = TriageRecord::with_id(future.clone(), PatientId::new(), name("Loaded"));

        list.insert(record.clone()).unwrap();
        assert!(matches!(list.insert(record), Err(TriageError::InvalidInput(_))));

        let next = list.open(PatientId::new(), name("Next"), t(0));
        assert!(next > future);
        assert_eq!(list.len(), 2);
    }
}
