#![warn(missing_docs)]
//! # cstd-app binary
//!
//! Interactive console shell for cstd-analyzer.

/// CLI entry point.
fn main() {
    if let Err(error) = shell::run() {
        eprintln!("failed to start cstd-analyzer shell: {error}");
        std::process::exit(1);
    }
}

mod shell {
    //! Line-oriented shell with login dialog, view routing, upload and
    //! listing commands, runtime status rendering, and per-run file logging.

    use std::fs::{File, OpenOptions};
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, OnceLock};

    use cstd_app::{
        CLASSIFY_ENDPOINT, FILES_ENDPOINT, app_version, logout, navigate, refresh_listing,
        submit_auth_dialog, submit_selected_file,
    };
    use cstd_auth::{NavDecision, SessionGate, ViewTarget};
    use cstd_classify::{
        ClassifyClient, ClassifyTransport, DirectorySink, MultipartSubmission,
    };
    use cstd_core::{HttpResponse, Role, TransportError};
    use cstd_files::{ListingClient, ListingPhase, ListingTransport};
    use cstd_store::{CredentialStore, FileStore};
    use cstd_ui::{DialogMode, UiState};
    use time::OffsetDateTime;

    const STORE_FILE_NAME: &str = "cstd_store.json";
    const DOWNLOADS_DIR_NAME: &str = "classified_downloads";

    static RUN_LOGGER: OnceLock<RunLogger> = OnceLock::new();

    struct RunLogger {
        file: Mutex<File>,
        path: PathBuf,
    }

    impl RunLogger {
        fn new() -> Result<Self, String> {
            let data_dir = runtime_data_dir()?;
            let timestamp = timestamp_compact_utc();
            let path = data_dir.join(format!("{timestamp}_log.txt"));
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|error| {
                    format!("unable to create log file '{}': {error}", path.display())
                })?;

            Ok(Self {
                file: Mutex::new(file),
                path,
            })
        }

        fn write_line(&self, level: &str, stage: &str, action: &str, detail: &str) {
            let timestamp = timestamp_compact_utc();
            let line = format!("{timestamp} | {level} | {stage} | {action} | {detail}\n");

            if let Ok(mut file) = self.file.lock() {
                let _ = file.write_all(line.as_bytes());
                if level == "ERROR" {
                    let _ = file.flush();
                }
            }
        }
    }

    /// Stub classify transport; the real classification service is an
    /// external collaborator. Success echoes the submitted bytes back with a
    /// server-style suggested filename; names containing `offline` or
    /// `reject` exercise the failure paths.
    struct StubClassifyTransport;

    impl ClassifyTransport for StubClassifyTransport {
        fn submit(
            &self,
            _endpoint: &str,
            submission: &MultipartSubmission,
        ) -> Result<HttpResponse, TransportError> {
            if submission.file_name.contains("offline") {
                return Err(TransportError::ConnectionFailed(
                    "connection refused by stub transport".to_string(),
                ));
            }

            if submission.file_name.contains("reject") {
                return Ok(HttpResponse {
                    status: 500,
                    status_text: "Internal Server Error".to_string(),
                    content_disposition: None,
                    body: br#"{"error":"An error occurred during prediction: stub rejection."}"#
                        .to_vec(),
                });
            }

            Ok(HttpResponse {
                status: 200,
                status_text: "OK".to_string(),
                content_disposition: Some(format!(
                    "attachment; filename=\"classified_{}.csv\"",
                    timestamp_compact_utc()
                )),
                body: submission.bytes.clone(),
            })
        }
    }

    /// Stub listing transport reporting the locally saved result files in
    /// the same `{"files": [...]}` shape as the remote service, latest
    /// first.
    struct StubListingTransport {
        downloads_dir: PathBuf,
    }

    impl ListingTransport for StubListingTransport {
        fn fetch(&self, _endpoint: &str) -> Result<HttpResponse, TransportError> {
            let mut names = Vec::new();
            if let Ok(entries) = std::fs::read_dir(&self.downloads_dir) {
                for entry in entries.flatten() {
                    let file_name = entry.file_name();
                    if let Some(name) = file_name.to_str()
                        && name.ends_with(".csv")
                    {
                        names.push(name.to_string());
                    }
                }
            }

            names.sort();
            names.reverse();

            let body = serde_json::json!({ "files": names }).to_string().into_bytes();
            Ok(HttpResponse {
                status: 200,
                status_text: "OK".to_string(),
                content_disposition: None,
                body,
            })
        }
    }

    struct AppController {
        ui: UiState,
        gate: SessionGate,
        store: CredentialStore,
        classify: ClassifyClient,
        listing: ListingClient,
    }

    impl AppController {
        fn new() -> Result<Self, String> {
            let data_dir = runtime_data_dir()?;
            let downloads_dir = data_dir.join(DOWNLOADS_DIR_NAME);

            let store = CredentialStore::new(Box::new(FileStore::open(
                data_dir.join(STORE_FILE_NAME),
            )));
            let gate = SessionGate::restore(&store);

            let classify = ClassifyClient::new(
                CLASSIFY_ENDPOINT,
                Arc::new(StubClassifyTransport),
                Arc::new(DirectorySink::new(downloads_dir.clone())),
            )
            .map_err(|error| format!("classify client init failed: {error}"))?;

            let listing = ListingClient::new(
                FILES_ENDPOINT,
                Arc::new(StubListingTransport { downloads_dir }),
            )
            .map_err(|error| format!("listing client init failed: {error}"))?;

            Ok(Self {
                ui: UiState::new(app_version()),
                gate,
                store,
                classify,
                listing,
            })
        }
    }

    /// Starts the shell loop and blocks until the user quits.
    pub fn run() -> Result<(), String> {
        initialize_logger()?;

        let mut controller = AppController::new()?;
        log_info(
            "bootstrap",
            "startup",
            &format!(
                "version={} restored_session={}",
                app_version(),
                controller.gate.is_authenticated()
            ),
        );

        println!("cstd-analyzer {} (type 'help' for commands)", app_version());
        render(&mut controller);

        let mut line = String::new();
        loop {
            print!("cstd> ");
            std::io::stdout()
                .flush()
                .map_err(|error| format!("stdout flush failed: {error}"))?;

            line.clear();
            let read = std::io::stdin()
                .read_line(&mut line)
                .map_err(|error| format!("stdin read failed: {error}"))?;
            if read == 0 {
                break;
            }

            match handle_command(&mut controller, line.trim()) {
                Ok(true) => render(&mut controller),
                Ok(false) => break,
                Err(error) => {
                    log_error("shell", "command", &error);
                    println!("error: {error}");
                }
            }
        }

        log_info("shell", "exit", "shell loop ended");
        Ok(())
    }

    fn handle_command(controller: &mut AppController, line: &str) -> Result<bool, String> {
        let (command, argument) = match line.split_once(' ') {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "help" => print_help(),
            "home" => switch_view(controller, ViewTarget::Home),
            "analyze" => switch_view(controller, ViewTarget::Analyze),
            "files" => switch_view(controller, ViewTarget::AdminFiles),
            "login" => open_dialog(controller, DialogMode::Login)?,
            "register" => open_dialog(controller, DialogMode::Register)?,
            "forgot" => open_dialog(controller, DialogMode::Forgot)?,
            "logout" => {
                logout(&mut controller.ui, &mut controller.gate, &mut controller.store)
                    .map_err(|error| error.to_string())?;
                log_info("auth", "logout", "session cleared");
            }
            "select" => select_file(controller, argument),
            "submit" => submit(controller),
            "status" => {}
            "quit" | "exit" => return Ok(false),
            other => println!("unknown command '{other}'; type 'help'"),
        }

        Ok(true)
    }

    fn print_help() {
        println!("views:     home | analyze | files");
        println!("account:   login | register | forgot | logout");
        println!("analysis:  select <path-to-csv> | submit");
        println!("misc:      status | help | quit");
    }

    fn switch_view(controller: &mut AppController, target: ViewTarget) {
        let decision = navigate(&mut controller.ui, &controller.gate, target);
        log_info("nav", "request", &format!("target={target:?} decision={decision:?}"));

        if decision == NavDecision::RequiresLogin {
            if let Err(error) = run_auth_dialog(controller) {
                log_error("auth", "dialog", &error);
                println!("error: {error}");
            }
        }
    }

    fn open_dialog(controller: &mut AppController, mode: DialogMode) -> Result<(), String> {
        controller.ui.open_dialog(mode);
        run_auth_dialog(controller)
    }

    fn run_auth_dialog(controller: &mut AppController) -> Result<(), String> {
        while controller.ui.dialog_open {
            let mode = controller.ui.dialog_mode;
            let title = match mode {
                DialogMode::Login => "Login to CSTD Analyzer",
                DialogMode::Register => "Create an Account",
                DialogMode::Forgot => "Reset your Password",
            };
            println!("-- {title} (empty username cancels) --");

            let username = prompt("Username: ")?;
            if username.trim().is_empty() {
                controller.ui.close_dialog();
                break;
            }

            let password_label = match mode {
                DialogMode::Forgot => "New password: ",
                _ => "Password: ",
            };
            let password = prompt(password_label)?;

            let role = if mode == DialogMode::Register {
                match Role::parse(&prompt("Role [user/admin]: ")?) {
                    Some(role) => role,
                    None => Role::User,
                }
            } else {
                Role::User
            };

            log_info(
                "auth",
                "dialog_submit",
                &format!(
                    "mode={mode:?} username_len={} password_len={}",
                    username.trim().len(),
                    password.trim().len()
                ),
            );

            let outcome = submit_auth_dialog(
                &mut controller.ui,
                &mut controller.gate,
                &mut controller.store,
                &username,
                &password,
                role,
            )
            .map_err(|error| error.to_string())?;

            if let Some(identity) = outcome {
                log_info("auth", "login_success", "session established");
                println!("Logged in as {} ({}).", identity.username, identity.role.as_str());
                break;
            }

            if let Some(message) = controller.ui.dialog_message.clone() {
                println!("{message}");
            }
        }

        Ok(())
    }

    fn select_file(controller: &mut AppController, argument: &str) {
        if argument.is_empty() {
            println!("usage: select <path-to-csv>");
            return;
        }

        let path = PathBuf::from(argument);
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(error) => {
                controller
                    .ui
                    .set_status(format!("Error: unable to read '{}': {error}", path.display()));
                return;
            }
        };

        match controller.classify.select_file(name.clone(), bytes) {
            Ok(()) => {
                controller.ui.set_status(format!("File selected: {name}"));
                log_info("upload", "file_selected", &format!("name={name}"));
            }
            Err(error) => {
                controller.ui.set_status(format!("Error: {error}"));
                log_error("upload", "file_rejected", &error.to_string());
            }
        }
    }

    fn submit(controller: &mut AppController) {
        match submit_selected_file(&mut controller.ui, &mut controller.classify) {
            Ok(report) => log_info(
                "upload",
                "complete",
                &format!(
                    "filename={} bytes_written={}",
                    report.filename, report.bytes_written
                ),
            ),
            Err(error) => log_error("upload", "failed", &error.to_string()),
        }
    }

    fn render(controller: &mut AppController) {
        if let Some(notice) = controller.ui.take_notice() {
            println!("! {notice}");
        }

        let identity = match controller.gate.current_identity() {
            Some(identity) => format!("{} ({})", identity.username, identity.role.as_str()),
            None => "anonymous".to_string(),
        };

        match controller.ui.view {
            ViewTarget::Home => {
                println!("[home] {identity}");
                println!(
                    "Cyber Security Threat Analyzer: upload CSV traffic logs for classification."
                );
            }
            ViewTarget::Analyze => {
                println!("[analyze] {identity}");
                println!("> {}", controller.ui.status_line);
                match controller.classify.selected_file_name() {
                    Some(name) => println!("> Selected: {name}"),
                    None => println!("> No file selected."),
                }
            }
            ViewTarget::AdminFiles => {
                println!("[admin files] {identity}");
                render_listing(controller);
            }
        }
    }

    fn render_listing(controller: &AppController) {
        println!("Loading files...");
        match refresh_listing(&controller.listing) {
            ListingPhase::Loading => {}
            ListingPhase::Failed(message) => {
                log_error("listing", "refresh", &message);
                println!("{message}");
            }
            ListingPhase::Loaded(entries) => {
                log_info("listing", "refresh", &format!("count={}", entries.len()));
                if entries.is_empty() {
                    println!("No classified files found yet.");
                    return;
                }

                for (index, entry) in entries.iter().enumerate() {
                    println!("{:>3}  {}  {}", index + 1, entry.name, entry.download_url);
                }
            }
        }
    }

    fn prompt(label: &str) -> Result<String, String> {
        print!("{label}");
        std::io::stdout()
            .flush()
            .map_err(|error| format!("stdout flush failed: {error}"))?;

        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .map_err(|error| format!("stdin read failed: {error}"))?;
        Ok(line.trim().to_string())
    }

    fn runtime_data_dir() -> Result<PathBuf, String> {
        let exe_path = std::env::current_exe()
            .map_err(|error| format!("unable to resolve executable path: {error}"))?;
        let exe_dir = exe_path
            .parent()
            .ok_or_else(|| "executable parent directory is missing".to_string())?;
        Ok(exe_dir.to_path_buf())
    }

    fn initialize_logger() -> Result<(), String> {
        if RUN_LOGGER.get().is_some() {
            return Ok(());
        }

        let logger = RunLogger::new()?;
        let path = logger.path.display().to_string();
        let _ = RUN_LOGGER.set(logger);
        log_info("logging", "file_created", &format!("log_file={path}"));
        Ok(())
    }

    fn log_info(stage: &str, action: &str, detail: &str) {
        if let Some(logger) = RUN_LOGGER.get() {
            logger.write_line("INFO", stage, action, detail);
        }
    }

    fn log_error(stage: &str, action: &str, detail: &str) {
        if let Some(logger) = RUN_LOGGER.get() {
            logger.write_line("ERROR", stage, action, detail);
        }
    }

    fn timestamp_compact_utc() -> String {
        let now = OffsetDateTime::now_utc();
        format!(
            "{:04}{:02}{:02}_{:02}{:02}{:02}",
            now.year(),
            now.month() as u8,
            now.day(),
            now.hour(),
            now.minute(),
            now.second()
        )
    }
}
