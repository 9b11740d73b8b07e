use crate::common;
use aptscope::dashboard;
use aptscope_core::Session;
use tempfile::tempdir;
use tokio::io::BufReader;

async fn run_script(script: &str, session: &mut Session, output_dir: &std::path::Path) -> String {
    let app = common::app(output_dir);
    let mut out = Vec::new();
    dashboard::run(&app, session, BufReader::new(script.as_bytes()), &mut out)
        .await
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_scripted_session() {
    let dir = tempdir().unwrap();
    let csv_path = dir.path().join("deals.csv");
    let html_path = dir.path().join("view.html");
    let script = format!(
        "export\nsearch 반포\nlist\nview 0\ncsv {}\nhtml {}\nquit\nsearch ignored\n",
        csv_path.display(),
        html_path.display()
    );
    let mut session = Session::new();

    let out = run_script(&script, &mut session, dir.path()).await;

    assert!(out.contains("View a result first"));
    assert!(out.contains("Results for 반포:"));
    assert!(out.contains("서울 서초구 반포동 20-43"));
    assert!(csv_path.is_file());
    assert!(html_path.is_file());
    assert_eq!(session.keyword(), Some("반포"));
    assert_eq!(session.detail().unwrap().0.name, "래미안퍼스티지");
}

#[tokio::test]
async fn test_bad_commands_do_not_end_the_session() {
    let dir = tempdir().unwrap();
    let mut session = Session::new();

    let out = run_script("fly away\nview 3\nsearch 반포\n", &mut session, dir.path()).await;

    assert!(out.contains("unknown command: fly"));
    assert!(out.contains("Error:"));
    assert_eq!(session.results().len(), 2);
}
