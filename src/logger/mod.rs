//! 파일 + 표준 출력 로거 설정 모듈
//!
//! `env_logger`를 전역 `log` 백엔드로 설치하면서, 출력 대상을 표준 출력과
//! 타임스탬프가 붙은 로그 파일 양쪽으로 보냅니다.
//!
//! # 로그 형식
//!
//! ```text
//! 2026/10/19 14:03:27.123456 INFO src/main.rs:42 ✅ 서버 시작
//! ```
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use backend_toolkit::logger::setup_logger_file;
//!
//! let handle = setup_logger_file("backend_toolkit.log")?;
//! if let Some(path) = handle.file_path() {
//!     log::info!("📝 로그 파일: {}", path.display());
//! }
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use env_logger::{Builder, Env, Target};
use thiserror::Error;

/// 기본 로그 디렉터리
pub const DEFAULT_LOG_DIR: &str = "logs";

/// 로거 설정 에러
#[derive(Error, Debug)]
pub enum LoggerError {
    /// 전역 로거가 이미 설치되어 있음
    #[error("a global logger has already been installed")]
    AlreadyInitialized,
}

/// 설치된 로거에 대한 정보
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerHandle {
    file_path: Option<PathBuf>,
}

impl LoggerHandle {
    /// 로그 파일 경로. 파일을 열지 못해 표준 출력만 사용하는 경우 `None`
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
}

/// 표준 출력과 (선택적) 파일에 동시에 쓰는 writer
pub struct TeeWriter {
    stdout: io::Stdout,
    file: Option<File>,
}

impl TeeWriter {
    pub fn new(file: Option<File>) -> Self {
        Self {
            stdout: io::stdout(),
            file,
        }
    }
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stdout.write_all(buf)?;
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()?;
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

/// `{dir}/{YYYYMMDD_HHMMSS}_{name}` 형식의 로그 파일 경로를 만듭니다.
pub fn log_file_path(dir: impl AsRef<Path>, name: &str, now: DateTime<Local>) -> PathBuf {
    dir.as_ref()
        .join(format!("{}_{}", now.format("%Y%m%d_%H%M%S"), name))
}

/// `logs/` 디렉터리에 로그 파일을 만들고 전역 로거를 설치합니다.
///
/// # Errors
///
/// * `LoggerError::AlreadyInitialized` - 이미 전역 로거가 설치된 경우
pub fn setup_logger_file(log_file_name: &str) -> Result<LoggerHandle, LoggerError> {
    setup_logger_file_in(DEFAULT_LOG_DIR, log_file_name)
}

/// 지정한 디렉터리에 로그 파일을 만들고 전역 로거를 설치합니다.
///
/// 파일을 열 수 없으면 표준 출력만 사용하며, 반환된 핸들의
/// `file_path()`는 `None`이 됩니다.
pub fn setup_logger_file_in(
    dir: impl AsRef<Path>,
    log_file_name: &str,
) -> Result<LoggerHandle, LoggerError> {
    let (file, file_path) = match open_log_file(dir.as_ref(), log_file_name, Local::now()) {
        Ok((file, path)) => (Some(file), Some(path)),
        Err(e) => {
            eprintln!("⚠️ 로그 파일을 열 수 없어 표준 출력만 사용합니다: {}", e);
            (None, None)
        }
    };

    build_logger(TeeWriter::new(file))
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    if let Some(path) = &file_path {
        log::info!("📝 로그 파일: {}", path.display());
    }

    Ok(LoggerHandle { file_path })
}

pub(crate) fn open_log_file(
    dir: &Path,
    name: &str,
    now: DateTime<Local>,
) -> io::Result<(File, PathBuf)> {
    fs::create_dir_all(dir)?;

    let path = log_file_path(dir, name, now);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    Ok((file, path))
}

fn build_logger(writer: TeeWriter) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    builder
        .target(Target::Pipe(Box::new(writer)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} {}:{} {}",
                Local::now().format("%Y/%m/%d %H:%M:%S%.6f"),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        });

    builder
}
