//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use shared::domain::AthleteInfo;

pub enum BackendCommand {
    AnalyzeContract {
        athlete: AthleteInfo,
        file_path: PathBuf,
    },
    DownloadReportPdf {
        report_id: String,
        dest: PathBuf,
    },
    DashboardLogin {
        key: String,
    },
    LoadDashboard,
    LoadAnalytics,
    LoadDealDetail {
        deal_id: String,
    },
}
