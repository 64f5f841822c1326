//! Discount Catalog Service

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use lodge::{
    access::Principal,
    discounts::{CodeName, DiscountCode, DiscountDescription, DiscountError},
    ids::{PropertyId, UserId},
    money::ensure_currency,
};
use mockall::automock;
use rand::{Rng, distributions::Alphanumeric};
use rusty_money::{Money, iso::Currency};
use tracing::{Span, info};

use crate::{
    clock::Clock,
    domain::discounts::{
        DiscountCodesRepository, DiscountsServiceError,
        data::{DiscountCodeUpdate, DiscountFilter, NewDiscountCode},
    },
    store::StoreError,
};

const GENERATED_CODE_LEN: usize = 8;
const MAX_GENERATE_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct StoreDiscountsService {
    codes: Arc<dyn DiscountCodesRepository>,
    clock: Arc<dyn Clock>,
    currency: &'static Currency,
}

impl StoreDiscountsService {
    #[must_use]
    pub fn new(
        codes: Arc<dyn DiscountCodesRepository>,
        clock: Arc<dyn Clock>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            codes,
            clock,
            currency,
        }
    }

    fn build_code(
        &self,
        name: CodeName,
        new: &NewDiscountCode,
    ) -> Result<DiscountCode<'static>, DiscountsServiceError> {
        let mut code = DiscountCode::new(
            name,
            new.value,
            new.valid_from,
            new.valid_until,
            self.currency,
        )?
        .for_properties(new.applicable_properties.iter().copied())
        .for_users(new.applicable_users.iter().copied());

        code.max_uses = new.max_uses;
        code.description.clone_from(&new.description);
        code.created_at = self.clock.now();

        if let Some(minimum) = new.min_booking_amount {
            code.min_booking_amount = minimum;
        }

        self.validate(&code)?;

        Ok(code)
    }

    fn validate(&self, code: &DiscountCode<'static>) -> Result<(), DiscountsServiceError> {
        code.validate()?;

        ensure_currency(self.currency, &code.min_booking_amount).map_err(|_err| {
            DiscountError::CurrencyMismatch {
                expected: self.currency.iso_alpha_code,
                actual: code.min_booking_amount.currency().iso_alpha_code,
            }
        })?;

        Ok(())
    }
}

impl fmt::Debug for StoreDiscountsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreDiscountsService")
            .field("clock", &self.clock)
            .field("currency", &self.currency.iso_alpha_code)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DiscountsService for StoreDiscountsService {
    #[tracing::instrument(
        name = "discounts.service.create_code",
        skip(self, code),
        fields(
            actor = %principal.user,
            code = tracing::field::Empty,
            generated = code.code.is_none()
        ),
        err
    )]
    async fn create_code(
        &self,
        principal: Principal,
        code: NewDiscountCode,
    ) -> Result<DiscountCode<'static>, DiscountsServiceError> {
        if !principal.is_admin() {
            return Err(DiscountsServiceError::Forbidden);
        }

        let span = Span::current();

        if let Some(requested) = &code.code {
            let discount = self.build_code(CodeName::parse(requested)?, &code)?;

            span.record("code", tracing::field::display(&discount.code));

            self.codes.insert_code(discount.clone()).await?;

            info!(code = %discount.code, "created discount code");

            return Ok(discount);
        }

        for _ in 0..MAX_GENERATE_ATTEMPTS {
            let discount = self.build_code(generate_code()?, &code)?;

            match self.codes.insert_code(discount.clone()).await {
                Ok(()) => {
                    span.record("code", tracing::field::display(&discount.code));

                    info!(code = %discount.code, "created discount code");

                    return Ok(discount);
                }
                Err(StoreError::AlreadyExists) => {}
                Err(error) => return Err(error.into()),
            }
        }

        Err(DiscountsServiceError::AlreadyExists)
    }

    #[tracing::instrument(
        name = "discounts.service.list_codes",
        skip(self, filter),
        fields(actor = %principal.user),
        err
    )]
    async fn list_codes(
        &self,
        principal: Principal,
        filter: DiscountFilter,
    ) -> Result<Vec<DiscountCode<'static>>, DiscountsServiceError> {
        if !principal.is_admin() {
            return Err(DiscountsServiceError::Forbidden);
        }

        let search = filter.search.map(|search| search.trim().to_ascii_uppercase());

        let mut codes: Vec<_> = self
            .codes
            .list_codes()
            .await?
            .into_iter()
            .filter(|code| filter.is_active.is_none_or(|active| code.is_active == active))
            .filter(|code| {
                search
                    .as_deref()
                    .is_none_or(|search| code.code.as_str().contains(search))
            })
            .collect();

        codes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.code.cmp(&b.code))
        });

        Ok(codes)
    }

    #[tracing::instrument(
        name = "discounts.service.update_code",
        skip(self, update),
        fields(actor = %principal.user, code = %code),
        err
    )]
    async fn update_code(
        &self,
        principal: Principal,
        code: &str,
        update: DiscountCodeUpdate,
    ) -> Result<DiscountCode<'static>, DiscountsServiceError> {
        if !principal.is_admin() {
            return Err(DiscountsServiceError::Forbidden);
        }

        let original = CodeName::parse(code).map_err(|_err| DiscountsServiceError::NotFound)?;

        let mut discount = self
            .codes
            .get_code(&original)
            .await?
            .ok_or(DiscountsServiceError::NotFound)?;

        if let Some(renamed) = update.code {
            let renamed = CodeName::parse(&renamed)?;

            if renamed != original && self.codes.get_code(&renamed).await?.is_some() {
                return Err(DiscountsServiceError::AlreadyExists);
            }

            discount.code = renamed;
        }

        if let Some(description) = update.description {
            discount.description = Some(description);
        }

        if let Some(value) = update.value {
            discount.value = value;
        }

        if let Some(max_uses) = update.max_uses {
            discount.max_uses = max_uses;
        }

        if let Some(minimum) = update.min_booking_amount {
            discount.min_booking_amount = minimum;
        }

        if let Some(valid_from) = update.valid_from {
            discount.valid_from = valid_from;
        }

        if let Some(valid_until) = update.valid_until {
            discount.valid_until = valid_until;
        }

        if let Some(is_active) = update.is_active {
            discount.is_active = is_active;
        }

        self.validate(&discount)?;

        let stored = self.codes.replace_code(&original, discount).await?;

        info!(code = %stored.code, "updated discount code");

        Ok(stored)
    }

    #[tracing::instrument(
        name = "discounts.service.delete_code",
        skip(self),
        fields(actor = %principal.user, code = %code),
        err
    )]
    async fn delete_code(
        &self,
        principal: Principal,
        code: &str,
    ) -> Result<(), DiscountsServiceError> {
        if !principal.is_admin() {
            return Err(DiscountsServiceError::Forbidden);
        }

        let name = CodeName::parse(code).map_err(|_err| DiscountsServiceError::NotFound)?;

        if !self.codes.delete_code(&name).await? {
            return Err(DiscountsServiceError::NotFound);
        }

        info!(code = %name, "deleted discount code");

        Ok(())
    }

    #[tracing::instrument(
        name = "discounts.service.check_code",
        skip(self, amount),
        fields(code = %code, amount = %amount),
        err
    )]
    async fn check_code(
        &self,
        code: &str,
        amount: Money<'static, Currency>,
        user: Option<UserId>,
        property: Option<PropertyId>,
    ) -> Result<DiscountDescription<'static>, DiscountsServiceError> {
        let name = CodeName::parse(code).map_err(|_err| DiscountsServiceError::NotFound)?;

        let discount = self
            .codes
            .get_code(&name)
            .await?
            .filter(|discount| discount.is_active)
            .ok_or(DiscountsServiceError::NotFound)?;

        if let Some(reason) = discount.ineligibility(self.clock.now(), &amount, user, property) {
            return Err(DiscountsServiceError::Ineligible(reason));
        }

        Ok(discount.describe())
    }
}

fn generate_code() -> Result<CodeName, DiscountError> {
    let raw: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_CODE_LEN)
        .map(char::from)
        .collect();

    CodeName::parse(&raw)
}

#[automock]
#[async_trait]
pub trait DiscountsService: Send + Sync {
    /// Add a code to the catalog. Administrators only.
    async fn create_code(
        &self,
        principal: Principal,
        code: NewDiscountCode,
    ) -> Result<DiscountCode<'static>, DiscountsServiceError>;

    /// List codes matching `filter`, ordered by code. Administrators only.
    async fn list_codes(
        &self,
        principal: Principal,
        filter: DiscountFilter,
    ) -> Result<Vec<DiscountCode<'static>>, DiscountsServiceError>;

    /// Change a code. Administrators only.
    async fn update_code(
        &self,
        principal: Principal,
        code: &str,
        update: DiscountCodeUpdate,
    ) -> Result<DiscountCode<'static>, DiscountsServiceError>;

    /// Remove a code. Administrators only.
    async fn delete_code(&self, principal: Principal, code: &str)
    -> Result<(), DiscountsServiceError>;

    /// Describe a code if it could be applied to a booking of `amount`.
    async fn check_code(
        &self,
        code: &str,
        amount: Money<'static, Currency>,
        user: Option<UserId>,
        property: Option<PropertyId>,
    ) -> Result<DiscountDescription<'static>, DiscountsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use lodge::discounts::{DiscountKind, DiscountValue, Ineligibility};
    use rust_decimal::Decimal;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{
        clock::SystemClock,
        domain::discounts::MockDiscountCodesRepository,
        errors::ErrorKind,
        test::{TestContext, usd},
    };

    use super::*;

    fn ten_percent(now: Timestamp) -> Result<NewDiscountCode, Box<dyn std::error::Error>> {
        Ok(NewDiscountCode::new(
            DiscountValue::percentage(Decimal::TEN)?,
            now.checked_sub(SignedDuration::from_hours(24))?,
            now.checked_add(SignedDuration::from_hours(24 * 30))?,
        ))
    }

    #[tokio::test]
    async fn create_code_normalises_the_requested_code() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .discounts
            .create_code(ctx.admin(), ten_percent(ctx.now())?.with_code(" summer26 "))
            .await?;

        assert_eq!(created.code.as_str(), "SUMMER26");
        assert_eq!(created.current_uses, 0);
        assert!(created.is_active);

        Ok(())
    }

    #[tokio::test]
    async fn create_code_generates_a_code_when_omitted() -> TestResult {
        let ctx = TestContext::new().await;

        let created = ctx
            .discounts
            .create_code(ctx.admin(), ten_percent(ctx.now())?)
            .await?;

        assert_eq!(created.code.as_str().len(), GENERATED_CODE_LEN);
        assert!(
            created
                .code
                .as_str()
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_code_requires_an_administrator() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .discounts
            .create_code(ctx.host(), ten_percent(ctx.now())?.with_code("HOSTDEAL"))
            .await;

        assert!(
            matches!(result, Err(DiscountsServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_code_rejects_duplicates_case_insensitively() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.discounts
            .create_code(ctx.admin(), ten_percent(ctx.now())?.with_code("WINTER"))
            .await?;

        let result = ctx
            .discounts
            .create_code(ctx.admin(), ten_percent(ctx.now())?.with_code("winter"))
            .await;

        assert!(
            matches!(result, Err(DiscountsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_code_rejects_invalid_input() -> TestResult {
        let ctx = TestContext::new().await;
        let now = ctx.now();

        let short = ctx
            .discounts
            .create_code(ctx.admin(), ten_percent(now)?.with_code("AB"))
            .await;

        let mut inverted = ten_percent(now)?.with_code("BACKWARDS");
        inverted.valid_until = now.checked_sub(SignedDuration::from_hours(24 * 2))?;

        let inverted = ctx.discounts.create_code(ctx.admin(), inverted).await;

        assert!(matches!(
            short,
            Err(DiscountsServiceError::Invalid(DiscountError::InvalidCode(_)))
        ));
        assert!(matches!(
            inverted,
            Err(DiscountsServiceError::Invalid(DiscountError::InvalidWindow))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn list_codes_filters_by_flag_and_search() -> TestResult {
        let ctx = TestContext::new().await;
        let now = ctx.now();

        for code in ["SPRING", "SUMMER", "AUTUMN"] {
            ctx.discounts
                .create_code(ctx.admin(), ten_percent(now)?.with_code(code))
                .await?;
        }

        ctx.discounts
            .update_code(
                ctx.admin(),
                "autumn",
                DiscountCodeUpdate {
                    is_active: Some(false),
                    ..DiscountCodeUpdate::default()
                },
            )
            .await?;

        let active = ctx
            .discounts
            .list_codes(
                ctx.admin(),
                DiscountFilter {
                    is_active: Some(true),
                    search: None,
                },
            )
            .await?;

        let searched = ctx
            .discounts
            .list_codes(
                ctx.admin(),
                DiscountFilter {
                    is_active: None,
                    search: Some("s".to_string()),
                },
            )
            .await?;

        let names = |codes: &[DiscountCode<'static>]| -> Vec<String> {
            codes.iter().map(|code| code.code.to_string()).collect()
        };

        assert_eq!(names(&active), ["SPRING", "SUMMER"]);
        assert_eq!(names(&searched), ["SPRING", "SUMMER"]);

        Ok(())
    }

    #[tokio::test]
    async fn list_codes_puts_newest_first() -> TestResult {
        let ctx = TestContext::new().await;
        let now = ctx.now();

        for code in ["ALPHA", "BRAVO", "CHARLIE"] {
            ctx.discounts
                .create_code(ctx.admin(), ten_percent(now)?.with_code(code))
                .await?;

            ctx.clock.set(ctx.now().checked_add(SignedDuration::from_mins(5))?);
        }

        let codes = ctx
            .discounts
            .list_codes(ctx.admin(), DiscountFilter::default())
            .await?;

        let names: Vec<_> = codes.iter().map(|code| code.code.as_str()).collect();

        assert_eq!(names, ["CHARLIE", "BRAVO", "ALPHA"]);
        assert!(codes.first().is_some_and(|code| code.created_at > now));

        Ok(())
    }

    #[tokio::test]
    async fn update_code_renames_and_keeps_usage() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.discounts
            .create_code(ctx.admin(), ten_percent(ctx.now())?.with_code("OLDNAME"))
            .await?;

        ctx.store
            .increment_usage(&CodeName::parse("OLDNAME")?, 0)
            .await?;

        let updated = ctx
            .discounts
            .update_code(
                ctx.admin(),
                "oldname",
                DiscountCodeUpdate {
                    code: Some("newname".to_string()),
                    max_uses: Some(Some(10)),
                    ..DiscountCodeUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.code.as_str(), "NEWNAME");
        assert_eq!(updated.max_uses, Some(10));
        assert_eq!(updated.current_uses, 1);
        assert!(ctx.store.get_code(&CodeName::parse("OLDNAME")?).await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn update_code_refuses_to_rename_onto_another_code() -> TestResult {
        let ctx = TestContext::new().await;
        let now = ctx.now();

        for code in ["FIRST", "SECOND"] {
            ctx.discounts
                .create_code(ctx.admin(), ten_percent(now)?.with_code(code))
                .await?;
        }

        let result = ctx
            .discounts
            .update_code(
                ctx.admin(),
                "FIRST",
                DiscountCodeUpdate {
                    code: Some("second".to_string()),
                    ..DiscountCodeUpdate::default()
                },
            )
            .await;

        assert!(
            matches!(result, Err(DiscountsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_code_removes_it_once() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.discounts
            .create_code(ctx.admin(), ten_percent(ctx.now())?.with_code("GONE"))
            .await?;

        ctx.discounts.delete_code(ctx.admin(), "gone").await?;

        let again = ctx.discounts.delete_code(ctx.admin(), "gone").await;

        assert!(
            matches!(again, Err(DiscountsServiceError::NotFound)),
            "expected NotFound, got {again:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn check_code_describes_an_eligible_code() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.discounts
            .create_code(ctx.admin(), ten_percent(ctx.now())?.with_code("WELCOME"))
            .await?;

        let description = ctx
            .discounts
            .check_code("welcome", usd(200), Some(ctx.guest.id), None)
            .await?;

        assert_eq!(description.code.as_str(), "WELCOME");
        assert_eq!(description.kind, DiscountKind::Percentage);

        Ok(())
    }

    #[tokio::test]
    async fn check_code_hides_unknown_and_inactive_codes() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.discounts
            .create_code(ctx.admin(), ten_percent(ctx.now())?.with_code("PAUSED"))
            .await?;

        ctx.discounts
            .update_code(
                ctx.admin(),
                "PAUSED",
                DiscountCodeUpdate {
                    is_active: Some(false),
                    ..DiscountCodeUpdate::default()
                },
            )
            .await?;

        let paused = ctx.discounts.check_code("PAUSED", usd(200), None, None).await;
        let unknown = ctx.discounts.check_code("NOSUCH", usd(200), None, None).await;

        assert!(matches!(paused, Err(DiscountsServiceError::NotFound)));
        assert!(matches!(unknown, Err(DiscountsServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn check_code_reports_the_first_failing_reason() -> TestResult {
        let ctx = TestContext::new().await;

        let mut new = ten_percent(ctx.now())?.with_code("BIGSPEND");
        new.min_booking_amount = Some(usd(500));

        ctx.discounts.create_code(ctx.admin(), new).await?;

        let result = ctx.discounts.check_code("BIGSPEND", usd(499), None, None).await;

        assert!(
            matches!(
                result,
                Err(DiscountsServiceError::Ineligible(Ineligibility::MinimumAmount))
            ),
            "expected MinimumAmount, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn minimum_in_another_currency_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let mut new = ten_percent(ctx.now())?.with_code("EUROS");
        new.min_booking_amount = Some(Money::from_major(10, rusty_money::iso::EUR));

        let result = ctx.discounts.create_code(ctx.admin(), new).await;

        assert!(matches!(
            result,
            Err(DiscountsServiceError::Invalid(DiscountError::CurrencyMismatch { .. }))
        ));

        Ok(())
    }

    #[tokio::test]
    async fn storage_failures_surface_as_infrastructure_errors() -> TestResult {
        let mut codes = MockDiscountCodesRepository::new();

        codes
            .expect_get_code()
            .returning(|_| Err(StoreError::Unavailable("connection reset".to_string())));

        let service = StoreDiscountsService::new(Arc::new(codes), Arc::new(SystemClock), USD);

        let result = service.check_code("ANYCODE", usd(100), None, None).await;

        assert!(
            matches!(&result, Err(error) if error.kind() == ErrorKind::Infrastructure),
            "expected an infrastructure error, got {result:?}"
        );

        Ok(())
    }
}
