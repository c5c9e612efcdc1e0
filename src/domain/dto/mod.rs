//! # Data Transfer Objects (DTO) Module
//!
//! 클라이언트와 서버 간의 데이터 계약을 정의하는 모듈입니다.
//!
//! | 종류 | 명명 규칙 | 예 |
//! |------|-----------|----|
//! | 요청 | `{Action}{Entity}Request` | `IssueTokenRequest` |
//! | 응답 | `{Entity}Response` | `TokenResponse` |

pub mod tokens;

pub use tokens::*;
