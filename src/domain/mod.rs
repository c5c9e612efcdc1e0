//! # Domain Layer Module
//!
//! API 경계에서 주고받는 데이터 구조를 정의합니다.
//!
//! ```text
//! domain/
//! └── dto/
//!     └── tokens/
//!         ├── request.rs   - 토큰 발급/검증 요청
//!         └── response.rs  - 토큰 응답, ApiResponse 래퍼
//! ```

pub mod dto;

pub use dto::*;
