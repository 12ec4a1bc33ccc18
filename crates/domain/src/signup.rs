//! # 会員登録
//!
//! 会員登録フォームの入力検証と、ニュース API に送る値の組み立てを行う。
//!
//! ## 検証ルール
//!
//! - 全フィールド必須（1 つでも空なら「모든 필드를 입력해주세요.」）
//! - メールアドレスは `local@domain` 形式
//! - 生年月日は年・月・日を数値で受け取り、実在する日付かつ未来日でないこと
//! - 生年月日は `YYYY-MM-DD`（月・日はゼロ埋め）に組み立てる
//!
//! ```rust
//! use chrono::NaiveDate;
//! use trending_domain::signup::{SignupForm, SignupInput};
//!
//! let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
//! let form = SignupForm::new(
//!     SignupInput {
//!         email:       "reader@example.com",
//!         password:    "secret-pass",
//!         nickname:    "독자",
//!         birth_year:  "1995",
//!         birth_month: "3",
//!         birth_day:   "7",
//!     },
//!     today,
//! )?;
//! assert_eq!(form.birth_date.to_string(), "1995-03-07");
//! # Ok::<(), trending_domain::DomainError>(())
//! ```

use chrono::{Datelike, NaiveDate};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// メールアドレス（値オブジェクト）
///
/// # バリデーション
///
/// - 空文字列ではない
/// - `local@domain` 形式で、どちらも空でない
/// - 最大 255 文字
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
pub struct Email(String);

impl Email {
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation("이메일을 입력해주세요.".to_string()));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(
                "이메일 형식이 올바르지 않습니다.".to_string(),
            ));
        };

        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(DomainError::Validation(
                "이메일 형식이 올바르지 않습니다.".to_string(),
            ));
        }

        if value.len() > 255 {
            return Err(DomainError::Validation(
                "이메일은 255자 이내로 입력해주세요.".to_string(),
            ));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

define_validated_string! {
    /// ニックネーム（値オブジェクト）
    pub struct Nickname {
        label: "닉네임",
        max_length: 20,
    }
}

define_validated_string! {
    /// パスワード（値オブジェクト）
    ///
    /// ニュース API の `passwordHash` フィールドにそのまま渡す。
    /// ログに出ないよう Debug 出力はマスクされる。
    pub struct Password {
        label: "비밀번호",
        max_length: 100,
        pii: true,
    }
}

/// 生年月日（値オブジェクト）
///
/// `Display` は `YYYY-MM-DD` 形式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthDate(NaiveDate);

impl std::fmt::Display for BirthDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl BirthDate {
    /// 年・月・日の入力文字列から作成する
    ///
    /// `today` より後の日付は拒否する。
    pub fn from_parts(
        year: &str,
        month: &str,
        day: &str,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        let invalid = || DomainError::Validation("생년월일이 올바르지 않습니다.".to_string());

        let year: i32 = year.trim().parse().map_err(|_| invalid())?;
        let month: u32 = month.trim().parse().map_err(|_| invalid())?;
        let day: u32 = day.trim().parse().map_err(|_| invalid())?;

        if !(1900..=today.year()).contains(&year) {
            return Err(invalid());
        }

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
        if date > today {
            return Err(invalid());
        }

        Ok(Self(date))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

/// 会員登録フォームの生入力
#[derive(Debug, Clone, Copy)]
pub struct SignupInput<'a> {
    pub email:       &'a str,
    pub password:    &'a str,
    pub nickname:    &'a str,
    pub birth_year:  &'a str,
    pub birth_month: &'a str,
    pub birth_day:   &'a str,
}

impl SignupInput<'_> {
    fn has_blank_field(&self) -> bool {
        [
            self.email,
            self.password,
            self.nickname,
            self.birth_year,
            self.birth_month,
            self.birth_day,
        ]
        .iter()
        .any(|field| field.trim().is_empty())
    }
}

/// 検証済みの会員登録フォーム
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub email:      Email,
    pub password:   Password,
    pub nickname:   Nickname,
    pub birth_date: BirthDate,
}

impl SignupForm {
    pub fn new(input: SignupInput<'_>, today: NaiveDate) -> Result<Self, DomainError> {
        if input.has_blank_field() {
            return Err(DomainError::Validation(
                "모든 필드를 입력해주세요.".to_string(),
            ));
        }

        Ok(Self {
            email:      Email::new(input.email)?,
            password:   Password::new(input.password)?,
            nickname:   Nickname::new(input.nickname)?,
            birth_date: BirthDate::from_parts(
                input.birth_year,
                input.birth_month,
                input.birth_day,
                today,
            )?,
        })
    }
}
