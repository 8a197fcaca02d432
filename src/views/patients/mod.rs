pub mod patient_list;
pub mod patient_history;
pub mod new_record_modal;
pub mod record_detail;
