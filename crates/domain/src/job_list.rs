use std::path::Path;

use mailsync_errors::{SyncError, SyncResult};
use tracing::warn;

use crate::entities::Job;

const FIELD_SEPARATOR: char = ';';

/// 解析一行 `login1;password1[;login2;password2]`
///
/// 少于两个字段时返回 `None`。第三、四个字段缺失时目标凭据沿用源凭据，
/// 多余字段忽略。字段内容不做裁剪。
pub fn parse_job_line(line: &str) -> Option<Job> {
    let mut fields = line.split(FIELD_SEPARATOR);
    let source_login = fields.next()?;
    let source_password = fields.next()?;

    let mut job = Job::same_credentials(source_login, source_password);
    if let Some(dest_login) = fields.next() {
        job.dest_login = dest_login.to_string();
    }
    if let Some(dest_password) = fields.next() {
        job.dest_password = dest_password.to_string();
    }
    Some(job)
}

/// 按行解析任务列表，保持原有顺序
pub fn parse_job_list(content: &str) -> Vec<Job> {
    let mut jobs = Vec::new();
    for (index, raw) in content.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.trim().is_empty() {
            continue;
        }
        match parse_job_line(line) {
            Some(job) => jobs.push(job),
            None => warn!("忽略任务列表第 {} 行: 字段少于2个", index + 1),
        }
    }
    jobs
}

pub fn load_job_list<P: AsRef<Path>>(path: P) -> SyncResult<Vec<Job>> {
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).map_err(|e| SyncError::job_list(path, e))?;
    Ok(parse_job_list(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_two_fields_default_destination() {
        let job = parse_job_line("a;b").unwrap();
        assert_eq!(job, Job::new("a", "b", "a", "b"));
    }

    #[test]
    fn test_four_fields() {
        let job = parse_job_line("a;b;c;d").unwrap();
        assert_eq!(job, Job::new("a", "b", "c", "d"));
    }

    #[test]
    fn test_three_fields_keeps_source_password() {
        let job = parse_job_line("a;b;c").unwrap();
        assert_eq!(job, Job::new("a", "b", "c", "b"));
    }

    #[test]
    fn test_single_field_produces_no_job() {
        assert!(parse_job_line("lonely").is_none());
        assert!(parse_job_line("").is_none());
    }

    #[test]
    fn test_extra_fields_ignored() {
        let job = parse_job_line("a;b;c;d;e;f").unwrap();
        assert_eq!(job, Job::new("a", "b", "c", "d"));
    }

    #[test]
    fn test_empty_fields_are_opaque() {
        let job = parse_job_line("a;").unwrap();
        assert_eq!(job, Job::new("a", "", "a", ""));
    }

    #[test]
    fn test_parse_list_skips_blank_and_short_lines() {
        let content = "u1@x;p1\n\nbroken\nu2@x;p2;u2@y;q2\r\n   \nu3@x;p3\n";
        let jobs = parse_job_list(content);
        assert_eq!(
            jobs,
            vec![
                Job::new("u1@x", "p1", "u1@x", "p1"),
                Job::new("u2@x", "p2", "u2@y", "q2"),
                Job::new("u3@x", "p3", "u3@x", "p3"),
            ]
        );
    }

    #[test]
    fn test_parse_list_empty() {
        assert!(parse_job_list("").is_empty());
        assert!(parse_job_list("\n\n").is_empty());
    }

    #[test]
    fn test_load_job_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alice;pw1").unwrap();
        writeln!(file, "bob;pw2;robert;pw3").unwrap();

        let jobs = load_job_list(file.path()).unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1].dest_login, "robert");
    }

    #[test]
    fn test_load_missing_job_list() {
        let err = load_job_list("/nonexistent/mails.txt").unwrap_err();
        assert!(matches!(err, SyncError::JobList { .. }));
        assert!(err.is_fatal());
    }
}
