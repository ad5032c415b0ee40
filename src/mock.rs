// file: src/mock.rs
// description: built-in sample inbox used before any upload
// reference: internal fixtures

use crate::models::{ClassificationSource, Message, TriageCategory, TriageLevel};
use crate::parser::parse_timestamp;
use chrono::{DateTime, Utc};

type SampleRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    TriageCategory,
    TriageLevel,
);

const SAMPLE_MESSAGES: [SampleRow; 15] = [
    (
        "1",
        "Chest Pain and Shortness of Breath",
        "Patient called complaining of severe chest pain radiating to left arm with shortness of breath starting 30 minutes ago. States pain is 8/10. Has history of hypertension.",
        "2023-05-15T08:23:45",
        TriageCategory::Clinical,
        TriageLevel::Urgent,
    ),
    (
        "2",
        "Medication Refill Request",
        "I need a refill of my lisinopril 10mg. I have 3 days of medication left. I've been taking it as prescribed with no side effects.",
        "2023-05-15T09:45:22",
        TriageCategory::Medication,
        TriageLevel::Medium,
    ),
    (
        "3",
        "Appointment Reschedule Request",
        "I need to reschedule my annual physical scheduled for May 20th. I'm available any day the following week in the morning.",
        "2023-05-15T10:12:05",
        TriageCategory::Administrative,
        TriageLevel::Low,
    ),
    (
        "4",
        "Abnormal Lab Results",
        "My patient portal shows abnormal results for my recent blood work. My potassium is 5.9 mEq/L which is flagged as high. Should I be concerned?",
        "2023-05-15T11:34:18",
        TriageCategory::LabResult,
        TriageLevel::High,
    ),
    (
        "5",
        "Severe Allergic Reaction",
        "I started the new antibiotic this morning and now have a rash all over my body and my face is swelling. I took Benadryl but it's not helping.",
        "2023-05-15T13:02:56",
        TriageCategory::Clinical,
        TriageLevel::Urgent,
    ),
    (
        "6",
        "Insurance Coverage Question",
        "I received a bill for my last visit indicating my insurance didn't cover the full amount. Can someone from billing please contact me to discuss payment options?",
        "2023-05-15T14:23:11",
        TriageCategory::Insurance,
        TriageLevel::Low,
    ),
    (
        "7",
        "Specialist Referral Request",
        "I'd like to request a referral to a dermatologist for a suspicious mole on my back that has changed in appearance over the last month.",
        "2023-05-15T15:45:02",
        TriageCategory::Referral,
        TriageLevel::Medium,
    ),
    (
        "8",
        "Worsening Diabetes Symptoms",
        "My blood glucose readings have been over 300 for the past three days despite taking my insulin as prescribed. I'm feeling very fatigued and thirsty.",
        "2023-05-16T09:12:34",
        TriageCategory::Clinical,
        TriageLevel::High,
    ),
    (
        "9",
        "Follow-up Question After Surgery",
        "I had my appendectomy last week. The incision site is now red and warm to the touch, and I noticed some yellow drainage this morning. Is this normal?",
        "2023-05-16T10:24:15",
        TriageCategory::FollowUp,
        TriageLevel::High,
    ),
    (
        "10",
        "Medication Side Effect",
        "I started taking the metformin two days ago and have been experiencing severe diarrhea. Should I continue taking it or stop?",
        "2023-05-16T11:35:27",
        TriageCategory::Medication,
        TriageLevel::Medium,
    ),
    (
        "11",
        "Medical Records Request",
        "I need a copy of my medical records for the past year for an appointment with a specialist. Can you please send them to me?",
        "2023-05-16T13:47:39",
        TriageCategory::Administrative,
        TriageLevel::Low,
    ),
    (
        "12",
        "Severe Migraine Not Responding to Medication",
        "I've had a migraine for 3 days straight. My prescription medication isn't working, and I'm experiencing visual disturbances and nausea. I can't keep food down.",
        "2023-05-16T15:28:51",
        TriageCategory::Clinical,
        TriageLevel::Urgent,
    ),
    (
        "13",
        "Insurance Prior Authorization",
        "My pharmacy says they need prior authorization for my Humira prescription. Can you please submit the necessary paperwork to my insurance?",
        "2023-05-17T08:59:03",
        TriageCategory::Insurance,
        TriageLevel::Medium,
    ),
    (
        "14",
        "Vaccination Records",
        "I need my vaccination records for my new job. Specifically, they're asking for proof of COVID-19, Tdap, and MMR vaccinations.",
        "2023-05-17T10:10:15",
        TriageCategory::Administrative,
        TriageLevel::Low,
    ),
    (
        "15",
        "Concerning Lab Values",
        "My INR result from yesterday is 4.8. I'm taking warfarin 5mg daily as prescribed. Should I adjust my dose?",
        "2023-05-17T11:21:27",
        TriageCategory::LabResult,
        TriageLevel::Urgent,
    ),
];

pub fn mock_messages() -> Vec<Message> {
    SAMPLE_MESSAGES
        .iter()
        .map(
            |&(id, subject, content, datetime, triage_category, triage_level)| Message {
                id: id.to_string(),
                subject: subject.to_string(),
                content: content.to_string(),
                datetime: parse_timestamp(datetime).unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
                triage_level,
                triage_category,
                classified_by: ClassificationSource::Preset,
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_ids_unique() {
        let messages = mock_messages();
        let ids: HashSet<_> = messages.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), 15);
    }

    #[test]
    fn test_sample_timestamps_parse() {
        assert!(
            mock_messages()
                .iter()
                .all(|m| m.datetime != DateTime::<Utc>::UNIX_EPOCH)
        );
    }
}
