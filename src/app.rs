use std::path::Path;

use anyhow::{anyhow, Result};
use chrono::{Datelike, Local, NaiveDate};
use tui::{backend::Backend, Terminal};

use crate::auth::{self, Session};
use crate::db::Database;
use crate::domain::reports::{dashboard_summary, DashboardData};
use crate::domain::validation::{check_contract_amount, check_down_payment_total};
use crate::images::ImageStore;
use crate::models::PaymentStatus;
use crate::ui::{
    components::popup::{render_notice, Notice},
    contract_wizard::{
        handle_input as handle_contract_wizard_input, render_contract_wizard, ContractChoices,
        ContractWizardAction, ContractWizardState,
    },
    contracts::{handle_input as handle_contracts_input, render_contracts, ContractAction, ContractsState},
    customer_wizard::{
        handle_input as handle_customer_wizard_input, render_customer_wizard, CustomerWizardAction,
        CustomerWizardState,
    },
    customers::{handle_input as handle_customers_input, render_customers, CustomerAction, CustomersState},
    dashboard::{handle_input as handle_dashboard_input, render_dashboard, DashboardAction, DashboardState, MenuItem},
    down_payment_wizard::{
        handle_input as handle_down_payment_wizard_input, render_down_payment_wizard,
        DownPaymentWizardAction, DownPaymentWizardState,
    },
    down_payments::{
        handle_input as handle_down_payments_input, render_down_payments, DownPaymentAction,
        DownPaymentsState,
    },
    employee_wizard::{
        handle_input as handle_employee_wizard_input, render_employee_wizard, EmployeeWizardAction,
        EmployeeWizardState,
    },
    employees::{handle_input as handle_employees_input, render_employees, EmployeeAction, EmployeesState},
    expense_wizard::{
        handle_input as handle_expense_wizard_input, render_expense_wizard, ExpenseWizardAction,
        ExpenseWizardState,
    },
    expenses::{handle_input as handle_expenses_input, render_expenses, ExpenseAction, ExpensesState},
    login::{handle_input as handle_login_input, render_login, LoginAction, LoginState},
    properties::{handle_input as handle_properties_input, render_properties, PropertiesState, PropertyAction},
    property_images::{
        handle_input as handle_property_images_input, render_property_images, PropertyImagesAction,
        PropertyImagesState,
    },
    property_wizard::{
        handle_input as handle_property_wizard_input, render_property_wizard, PropertyWizardAction,
        PropertyWizardState,
    },
    read_key,
    reports::{handle_input as handle_reports_input, render_reports, ReportAction, ReportData, ReportsState},
};

// Represents the current screen in the app
#[derive(Clone, Copy, PartialEq, Debug)]
enum AppScreen {
    Login,
    Dashboard,
    Properties,
    PropertyWizard,
    PropertyImages,
    Customers,
    CustomerWizard,
    Employees,
    EmployeeWizard,
    Contracts,
    ContractWizard,
    DownPayments,
    DownPaymentWizard,
    Expenses,
    ExpenseWizard,
    Reports,
}

// Main application state
pub struct AppState {
    db: Database,
    images: ImageStore,
    session: Option<Session>,
    screen: AppScreen,
    notice: Option<Notice>,
    login_state: Option<LoginState>,
    dashboard_state: Option<DashboardState>,
    properties_state: Option<PropertiesState>,
    property_wizard_state: Option<PropertyWizardState>,
    property_images_state: Option<PropertyImagesState>,
    customers_state: Option<CustomersState>,
    customer_wizard_state: Option<CustomerWizardState>,
    employees_state: Option<EmployeesState>,
    employee_wizard_state: Option<EmployeeWizardState>,
    contracts_state: Option<ContractsState>,
    contract_wizard_state: Option<ContractWizardState>,
    down_payments_state: Option<DownPaymentsState>,
    down_payment_wizard_state: Option<DownPaymentWizardState>,
    expenses_state: Option<ExpensesState>,
    expense_wizard_state: Option<ExpenseWizardState>,
    reports_state: Option<ReportsState>,
}

impl AppState {
    pub fn new(db: Database, images: ImageStore) -> Self {
        Self {
            db,
            images,
            session: None,
            screen: AppScreen::Login,
            notice: None,
            login_state: Some(LoginState::new()),
            dashboard_state: None,
            properties_state: None,
            property_wizard_state: None,
            property_images_state: None,
            customers_state: None,
            customer_wizard_state: None,
            employees_state: None,
            employee_wizard_state: None,
            contracts_state: None,
            contract_wizard_state: None,
            down_payments_state: None,
            down_payment_wizard_state: None,
            expenses_state: None,
            expense_wizard_state: None,
            reports_state: None,
        }
    }

    fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or_else(|| anyhow!("Not signed in"))
    }

    fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_admin)
    }

    fn inform(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::info(text));
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| {
            match app_state.screen {
                AppScreen::Login => {
                    if let Some(state) = &app_state.login_state {
                        render_login(f, state);
                    }
                }
                AppScreen::Dashboard => {
                    if let Some(state) = &mut app_state.dashboard_state {
                        render_dashboard(f, state);
                    }
                }
                AppScreen::Properties => {
                    if let Some(state) = &mut app_state.properties_state {
                        render_properties(f, state);
                    }
                }
                AppScreen::PropertyWizard => {
                    if let Some(state) = &app_state.property_wizard_state {
                        render_property_wizard(f, state);
                    }
                }
                AppScreen::PropertyImages => {
                    if let Some(state) = &mut app_state.property_images_state {
                        render_property_images(f, state);
                    }
                }
                AppScreen::Customers => {
                    if let Some(state) = &mut app_state.customers_state {
                        render_customers(f, state);
                    }
                }
                AppScreen::CustomerWizard => {
                    if let Some(state) = &app_state.customer_wizard_state {
                        render_customer_wizard(f, state);
                    }
                }
                AppScreen::Employees => {
                    if let Some(state) = &mut app_state.employees_state {
                        render_employees(f, state);
                    }
                }
                AppScreen::EmployeeWizard => {
                    if let Some(state) = &app_state.employee_wizard_state {
                        render_employee_wizard(f, state);
                    }
                }
                AppScreen::Contracts => {
                    if let Some(state) = &mut app_state.contracts_state {
                        render_contracts(f, state);
                    }
                }
                AppScreen::ContractWizard => {
                    if let Some(state) = &app_state.contract_wizard_state {
                        render_contract_wizard(f, state);
                    }
                }
                AppScreen::DownPayments => {
                    if let Some(state) = &mut app_state.down_payments_state {
                        render_down_payments(f, state);
                    }
                }
                AppScreen::DownPaymentWizard => {
                    if let Some(state) = &app_state.down_payment_wizard_state {
                        render_down_payment_wizard(f, state);
                    }
                }
                AppScreen::Expenses => {
                    if let Some(state) = &mut app_state.expenses_state {
                        render_expenses(f, state);
                    }
                }
                AppScreen::ExpenseWizard => {
                    if let Some(state) = &app_state.expense_wizard_state {
                        render_expense_wizard(f, state);
                    }
                }
                AppScreen::Reports => {
                    if let Some(state) = &app_state.reports_state {
                        render_reports(f, state);
                    }
                }
            }

            if let Some(notice) = &app_state.notice {
                render_notice(f, notice);
            }
        })?;

        // A notice swallows the next key press
        if app_state.notice.is_some() {
            if read_key()?.is_some() {
                app_state.notice = None;
            }
            continue;
        }

        // Handle input for current screen; failures are reported and the loop goes on
        match handle_screen(app_state).await {
            Ok(true) => break,
            Ok(false) => {}
            Err(err) => {
                tracing::error!(screen = ?app_state.screen, error = %format!("{err:#}"), "operation failed");
                app_state.notice = Some(Notice::error(format!("{err:#}")));
            }
        }
    }

    Ok(())
}

async fn handle_screen(app_state: &mut AppState) -> Result<bool> {
    match app_state.screen {
        AppScreen::Login => handle_login_screen(app_state).await,
        AppScreen::Dashboard => handle_dashboard_screen(app_state).await,
        AppScreen::Properties => handle_properties_screen(app_state).await,
        AppScreen::PropertyWizard => handle_property_wizard_screen(app_state).await,
        AppScreen::PropertyImages => handle_property_images_screen(app_state).await,
        AppScreen::Customers => handle_customers_screen(app_state).await,
        AppScreen::CustomerWizard => handle_customer_wizard_screen(app_state).await,
        AppScreen::Employees => handle_employees_screen(app_state).await,
        AppScreen::EmployeeWizard => handle_employee_wizard_screen(app_state).await,
        AppScreen::Contracts => handle_contracts_screen(app_state).await,
        AppScreen::ContractWizard => handle_contract_wizard_screen(app_state).await,
        AppScreen::DownPayments => handle_down_payments_screen(app_state).await,
        AppScreen::DownPaymentWizard => handle_down_payment_wizard_screen(app_state).await,
        AppScreen::Expenses => handle_expenses_screen(app_state).await,
        AppScreen::ExpenseWizard => handle_expense_wizard_screen(app_state).await,
        AppScreen::Reports => handle_reports_screen(app_state).await,
    }
}

async fn handle_login_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.login_state {
        Some(state) => handle_login_input(state)?,
        None => None,
    };

    match action {
        Some(LoginAction::Quit) => return Ok(true),
        Some(LoginAction::Submit { username, password }) => {
            let user = app_state.db.find_user_by_username(&username).await?;
            match auth::authenticate(user, &password) {
                Ok(session) => {
                    tracing::info!(user_id = session.user_id, user = %session.username, admin = session.is_admin, "signed in");
                    app_state.session = Some(session);
                    app_state.login_state = None;
                    load_dashboard_screen(app_state).await?;
                }
                Err(err) => {
                    tracing::warn!(user = %username, "failed sign-in attempt");
                    app_state.login_state = Some(LoginState::failed(&username, err.to_string()));
                }
            }
        }
        None => {}
    }

    Ok(false)
}

async fn load_dashboard_screen(app_state: &mut AppState) -> Result<()> {
    let db = &app_state.db;
    let properties = db.load_properties().await?;
    let customers = db.load_customers().await?;
    let employees = db.load_employees().await?;
    let contracts = db.load_contracts().await?;
    let payments = db.load_down_payments().await?;
    let expenses = db.load_expenses().await?;

    let summary = dashboard_summary(
        &DashboardData {
            properties: &properties,
            customers: &customers,
            employees: &employees,
            contracts: &contracts,
            payments: &payments,
            expenses: &expenses,
        },
        today(),
    );

    let session = app_state.session()?;
    app_state.dashboard_state = Some(DashboardState::new(
        session.full_name.clone(),
        session.is_admin,
        summary,
    ));
    app_state.screen = AppScreen::Dashboard;

    Ok(())
}

async fn handle_dashboard_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.dashboard_state {
        Some(state) => handle_dashboard_input(state)?,
        None => None,
    };

    match action {
        Some(DashboardAction::Quit) => return Ok(true),
        Some(DashboardAction::Open(item)) => match item {
            MenuItem::Properties => load_properties_screen(app_state, "").await?,
            MenuItem::Customers => load_customers_screen(app_state, "").await?,
            MenuItem::Employees => load_employees_screen(app_state, "").await?,
            MenuItem::Contracts => load_contracts_screen(app_state, "").await?,
            MenuItem::DownPayments => load_down_payments_screen(app_state, "").await?,
            MenuItem::Expenses => load_expenses_screen(app_state, "").await?,
            MenuItem::Reports => load_reports_screen(app_state).await?,
            MenuItem::Logout => {
                if let Some(session) = app_state.session.take() {
                    tracing::info!(user = %session.username, "signed out");
                }
                app_state.dashboard_state = None;
                app_state.login_state = Some(LoginState::new());
                app_state.screen = AppScreen::Login;
            }
        },
        None => {}
    }

    Ok(false)
}

// Properties

fn properties_filter(app_state: &AppState) -> String {
    app_state
        .properties_state
        .as_ref()
        .map(|s| s.filter().to_string())
        .unwrap_or_default()
}

async fn load_properties_screen(app_state: &mut AppState, filter: &str) -> Result<()> {
    let properties = app_state.db.load_properties().await?;
    let employees = app_state.db.load_employees().await?;

    app_state.properties_state =
        Some(PropertiesState::new(properties, &employees, app_state.is_admin()).with_filter(filter));
    app_state.screen = AppScreen::Properties;

    Ok(())
}

async fn handle_properties_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.properties_state {
        Some(state) => handle_properties_input(state)?,
        None => None,
    };

    match action {
        Some(PropertyAction::Back) => load_dashboard_screen(app_state).await?,
        Some(PropertyAction::NewProperty) => {
            let employees = app_state.db.load_employees().await?;
            let codes = app_state
                .properties_state
                .as_ref()
                .map(|s| s.listing_codes())
                .unwrap_or_default();
            let wizard = PropertyWizardState::new(codes, &employees, today());
            app_state.property_wizard_state = Some(wizard);
            app_state.screen = AppScreen::PropertyWizard;
        }
        Some(PropertyAction::EditProperty(id)) => {
            let property = app_state.db.get_property(id).await?;
            let employees = app_state.db.load_employees().await?;
            app_state.property_wizard_state = Some(PropertyWizardState::from_existing(property, &employees));
            app_state.screen = AppScreen::PropertyWizard;
        }
        Some(PropertyAction::DeleteProperty(id)) => {
            app_state.session()?.require_admin("delete properties")?;
            let stored = app_state.db.delete_property(id).await?;
            for path in &stored {
                if let Err(err) = app_state.images.remove(Path::new(path)) {
                    tracing::warn!(path = %path, error = %err, "could not remove image file");
                }
            }
            tracing::info!(property_id = id, images = stored.len(), "property deleted");

            let filter = properties_filter(app_state);
            load_properties_screen(app_state, &filter).await?;
            app_state.inform("Property deleted");
        }
        Some(PropertyAction::ManageImages(id)) => load_property_images_screen(app_state, id).await?,
        None => {}
    }

    Ok(false)
}

async fn handle_property_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.property_wizard_state {
        Some(state) => handle_property_wizard_input(state)?,
        None => None,
    };

    match action {
        Some(PropertyWizardAction::Cancel) => {
            let filter = properties_filter(app_state);
            load_properties_screen(app_state, &filter).await?;
        }
        Some(PropertyWizardAction::Save(property)) => {
            if property.id == 0 {
                let id = app_state.db.create_property(&property).await?;
                tracing::info!(property_id = id, code = %property.listing_code, "property created");
            } else {
                app_state.db.update_property(&property).await?;
                tracing::info!(property_id = property.id, "property updated");
            }

            let filter = properties_filter(app_state);
            load_properties_screen(app_state, &filter).await?;
            app_state.inform(format!("Property {} saved", property.listing_code));
        }
        None => {}
    }

    Ok(false)
}

async fn load_property_images_screen(app_state: &mut AppState, property_id: i32) -> Result<()> {
    let property = app_state.db.get_property(property_id).await?;
    let images = app_state.db.load_property_images(property_id).await?;

    app_state.property_images_state = Some(PropertyImagesState::new(&property, images, app_state.is_admin()));
    app_state.screen = AppScreen::PropertyImages;

    Ok(())
}

async fn handle_property_images_screen(app_state: &mut AppState) -> Result<bool> {
    let (property_id, action) = match &mut app_state.property_images_state {
        Some(state) => (state.property_id(), handle_property_images_input(state)?),
        None => return Ok(false),
    };

    match action {
        Some(PropertyImagesAction::Back) => {
            let filter = properties_filter(app_state);
            load_properties_screen(app_state, &filter).await?;
        }
        Some(PropertyImagesAction::Add(source)) => {
            let stored = app_state.images.store(property_id, &source)?;
            let path = stored.to_string_lossy().into_owned();
            if let Err(err) = app_state.db.add_property_image(property_id, &path).await {
                app_state.images.remove(&stored)?;
                return Err(err);
            }
            tracing::info!(property_id, path = %path, "image added");

            load_property_images_screen(app_state, property_id).await?;
            app_state.inform("Image added");
        }
        Some(PropertyImagesAction::Delete(id)) => {
            app_state.session()?.require_admin("delete images")?;
            let path = app_state.db.delete_property_image(id).await?;
            app_state.images.remove(Path::new(&path))?;
            tracing::info!(property_id, image_id = id, "image removed");

            load_property_images_screen(app_state, property_id).await?;
        }
        None => {}
    }

    Ok(false)
}

// Customers

fn customers_filter(app_state: &AppState) -> String {
    app_state
        .customers_state
        .as_ref()
        .map(|s| s.filter().to_string())
        .unwrap_or_default()
}

async fn load_customers_screen(app_state: &mut AppState, filter: &str) -> Result<()> {
    let customers = app_state.db.load_customers().await?;

    app_state.customers_state = Some(CustomersState::new(customers, app_state.is_admin()).with_filter(filter));
    app_state.screen = AppScreen::Customers;

    Ok(())
}

async fn handle_customers_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.customers_state {
        Some(state) => handle_customers_input(state)?,
        None => None,
    };

    match action {
        Some(CustomerAction::Back) => load_dashboard_screen(app_state).await?,
        Some(CustomerAction::NewCustomer) => {
            app_state.customer_wizard_state = Some(CustomerWizardState::new());
            app_state.screen = AppScreen::CustomerWizard;
        }
        Some(CustomerAction::EditCustomer(id)) => {
            let customer = app_state.db.get_customer(id).await?;
            app_state.customer_wizard_state = Some(CustomerWizardState::from_existing(customer));
            app_state.screen = AppScreen::CustomerWizard;
        }
        Some(CustomerAction::DeleteCustomer(id)) => {
            app_state.session()?.require_admin("delete customers")?;
            app_state.db.delete_customer(id).await?;
            tracing::info!(customer_id = id, "customer deleted");

            let filter = customers_filter(app_state);
            load_customers_screen(app_state, &filter).await?;
            app_state.inform("Customer deleted");
        }
        None => {}
    }

    Ok(false)
}

async fn handle_customer_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.customer_wizard_state {
        Some(state) => handle_customer_wizard_input(state)?,
        None => None,
    };

    match action {
        Some(CustomerWizardAction::Cancel) => {
            let filter = customers_filter(app_state);
            load_customers_screen(app_state, &filter).await?;
        }
        Some(CustomerWizardAction::Save(customer)) => {
            if customer.id == 0 {
                let id = app_state.db.create_customer(&customer).await?;
                tracing::info!(customer_id = id, "customer created");
            } else {
                app_state.db.update_customer(&customer).await?;
                tracing::info!(customer_id = customer.id, "customer updated");
            }

            let filter = customers_filter(app_state);
            load_customers_screen(app_state, &filter).await?;
            app_state.inform(format!("Customer {} saved", customer.full_name));
        }
        None => {}
    }

    Ok(false)
}

// Employees

fn employees_filter(app_state: &AppState) -> String {
    app_state
        .employees_state
        .as_ref()
        .map(|s| s.filter().to_string())
        .unwrap_or_default()
}

async fn load_employees_screen(app_state: &mut AppState, filter: &str) -> Result<()> {
    let employees = app_state.db.load_employees().await?;

    app_state.employees_state = Some(EmployeesState::new(employees, app_state.is_admin()).with_filter(filter));
    app_state.screen = AppScreen::Employees;

    Ok(())
}

async fn handle_employees_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.employees_state {
        Some(state) => handle_employees_input(state)?,
        None => None,
    };

    match action {
        Some(EmployeeAction::Back) => load_dashboard_screen(app_state).await?,
        Some(EmployeeAction::NewEmployee) => {
            let users = app_state.db.load_users().await?;
            app_state.employee_wizard_state = Some(EmployeeWizardState::new(&users, today()));
            app_state.screen = AppScreen::EmployeeWizard;
        }
        Some(EmployeeAction::EditEmployee(id)) => {
            let employee = app_state.db.get_employee(id).await?;
            let users = app_state.db.load_users().await?;
            app_state.employee_wizard_state = Some(EmployeeWizardState::from_existing(employee, &users));
            app_state.screen = AppScreen::EmployeeWizard;
        }
        Some(EmployeeAction::DeleteEmployee(id)) => {
            app_state.session()?.require_admin("delete employees")?;
            app_state.db.delete_employee(id).await?;
            tracing::info!(employee_id = id, "employee deleted");

            let filter = employees_filter(app_state);
            load_employees_screen(app_state, &filter).await?;
            app_state.inform("Employee deleted");
        }
        None => {}
    }

    Ok(false)
}

async fn handle_employee_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.employee_wizard_state {
        Some(state) => handle_employee_wizard_input(state)?,
        None => None,
    };

    match action {
        Some(EmployeeWizardAction::Cancel) => {
            let filter = employees_filter(app_state);
            load_employees_screen(app_state, &filter).await?;
        }
        Some(EmployeeWizardAction::Save(employee)) => {
            if employee.id == 0 {
                let id = app_state.db.create_employee(&employee).await?;
                tracing::info!(employee_id = id, "employee created");
            } else {
                app_state.db.update_employee(&employee).await?;
                tracing::info!(employee_id = employee.id, "employee updated");
            }

            let filter = employees_filter(app_state);
            load_employees_screen(app_state, &filter).await?;
            app_state.inform(format!("Employee {} saved", employee.full_name));
        }
        None => {}
    }

    Ok(false)
}

// Contracts

fn contracts_filter(app_state: &AppState) -> String {
    app_state
        .contracts_state
        .as_ref()
        .map(|s| s.filter().to_string())
        .unwrap_or_default()
}

async fn load_contracts_screen(app_state: &mut AppState, filter: &str) -> Result<()> {
    let contracts = app_state.db.load_contract_details().await?;
    let payments = app_state.db.load_down_payments().await?;

    app_state.contracts_state =
        Some(ContractsState::new(contracts, &payments, app_state.is_admin()).with_filter(filter));
    app_state.screen = AppScreen::Contracts;

    Ok(())
}

async fn handle_contracts_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.contracts_state {
        Some(state) => handle_contracts_input(state)?,
        None => None,
    };

    match action {
        Some(ContractAction::Back) => load_dashboard_screen(app_state).await?,
        Some(ContractAction::NewContract) => {
            let customers = app_state.db.load_customers().await?;
            let properties = app_state.db.load_properties().await?;
            let employees = app_state.db.load_employees().await?;
            let numbers = app_state
                .contracts_state
                .as_ref()
                .map(|s| s.contract_numbers())
                .unwrap_or_default();
            let choices = ContractChoices {
                customers: &customers,
                properties: &properties,
                employees: &employees,
            };
            let wizard = ContractWizardState::new(numbers, &choices, today());
            app_state.contract_wizard_state = Some(wizard);
            app_state.screen = AppScreen::ContractWizard;
        }
        Some(ContractAction::EditContract(id)) => {
            let contract = app_state.db.get_contract(id).await?;
            let customers = app_state.db.load_customers().await?;
            let properties = app_state.db.load_properties().await?;
            let employees = app_state.db.load_employees().await?;
            let choices = ContractChoices {
                customers: &customers,
                properties: &properties,
                employees: &employees,
            };
            app_state.contract_wizard_state = Some(ContractWizardState::from_existing(contract, &choices));
            app_state.screen = AppScreen::ContractWizard;
        }
        Some(ContractAction::DeleteContract(id)) => {
            app_state.session()?.require_admin("delete contracts")?;
            app_state.db.delete_contract(id).await?;
            tracing::info!(contract_id = id, "contract deleted");

            let filter = contracts_filter(app_state);
            load_contracts_screen(app_state, &filter).await?;
            app_state.inform("Contract and its down payments deleted");
        }
        Some(ContractAction::ShowPayments(number)) => {
            load_down_payments_screen(app_state, &number).await?;
        }
        None => {}
    }

    Ok(false)
}

async fn handle_contract_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.contract_wizard_state {
        Some(state) => handle_contract_wizard_input(state)?,
        None => None,
    };

    match action {
        Some(ContractWizardAction::Cancel) => {
            let filter = contracts_filter(app_state);
            load_contracts_screen(app_state, &filter).await?;
        }
        Some(ContractWizardAction::Save(contract)) => {
            if contract.id != 0 {
                let payments = app_state.db.load_down_payments_by_contract(contract.id).await?;
                if let Err(err) = check_contract_amount(&contract, &payments) {
                    if let Some(state) = &mut app_state.contract_wizard_state {
                        state.set_error(err.to_string());
                    }
                    return Ok(false);
                }
            }

            if contract.id == 0 {
                let id = app_state.db.create_contract(&contract).await?;
                tracing::info!(contract_id = id, number = %contract.contract_number, "contract created");
            } else {
                app_state.db.update_contract(&contract).await?;
                tracing::info!(contract_id = contract.id, "contract updated");
            }

            let filter = contracts_filter(app_state);
            load_contracts_screen(app_state, &filter).await?;
            app_state.inform(format!("Contract {} saved", contract.contract_number));
        }
        None => {}
    }

    Ok(false)
}

// Down payments

fn down_payments_filter(app_state: &AppState) -> String {
    app_state
        .down_payments_state
        .as_ref()
        .map(|s| s.filter().to_string())
        .unwrap_or_default()
}

async fn load_down_payments_screen(app_state: &mut AppState, filter: &str) -> Result<()> {
    let payments = app_state.db.load_down_payment_details().await?;

    app_state.down_payments_state =
        Some(DownPaymentsState::new(payments, app_state.is_admin()).with_filter(filter));
    app_state.screen = AppScreen::DownPayments;

    Ok(())
}

async fn handle_down_payments_screen(app_state: &mut AppState) -> Result<bool> {
    let (selected_contract, action) = match &mut app_state.down_payments_state {
        Some(state) => (state.selected_contract(), handle_down_payments_input(state)?),
        None => return Ok(false),
    };

    match action {
        Some(DownPaymentAction::Back) => load_dashboard_screen(app_state).await?,
        Some(DownPaymentAction::NewDownPayment) => {
            let contracts = app_state.db.load_contract_details().await?;
            app_state.down_payment_wizard_state =
                Some(DownPaymentWizardState::new(&contracts, selected_contract, today()));
            app_state.screen = AppScreen::DownPaymentWizard;
        }
        Some(DownPaymentAction::EditDownPayment(id)) => {
            let payment = app_state.db.get_down_payment(id).await?;
            let contracts = app_state.db.load_contract_details().await?;
            app_state.down_payment_wizard_state =
                Some(DownPaymentWizardState::from_existing(payment, &contracts));
            app_state.screen = AppScreen::DownPaymentWizard;
        }
        Some(DownPaymentAction::DeleteDownPayment(id)) => {
            app_state.session()?.require_admin("delete down payments")?;
            app_state.db.delete_down_payment(id).await?;
            tracing::info!(payment_id = id, "down payment deleted");

            let filter = down_payments_filter(app_state);
            load_down_payments_screen(app_state, &filter).await?;
            app_state.inform("Down payment deleted");
        }
        Some(DownPaymentAction::MarkPaid(id)) => {
            let mut payment = app_state.db.get_down_payment(id).await?;
            payment.status = PaymentStatus::Paid;
            app_state.db.update_down_payment(&payment).await?;
            tracing::info!(payment_id = id, "down payment marked paid");

            let filter = down_payments_filter(app_state);
            load_down_payments_screen(app_state, &filter).await?;
        }
        None => {}
    }

    Ok(false)
}

async fn handle_down_payment_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.down_payment_wizard_state {
        Some(state) => handle_down_payment_wizard_input(state)?,
        None => None,
    };

    match action {
        Some(DownPaymentWizardAction::Cancel) => {
            let filter = down_payments_filter(app_state);
            load_down_payments_screen(app_state, &filter).await?;
        }
        Some(DownPaymentWizardAction::Save(payment)) => {
            let contract = app_state.db.get_contract(payment.contract_id).await?;
            let existing = app_state.db.load_down_payments_by_contract(payment.contract_id).await?;
            if let Err(err) = check_down_payment_total(contract.amount, &existing, &payment) {
                if let Some(state) = &mut app_state.down_payment_wizard_state {
                    state.set_error(err.to_string());
                }
                return Ok(false);
            }

            if payment.id == 0 {
                let id = app_state.db.create_down_payment(&payment).await?;
                tracing::info!(payment_id = id, contract_id = payment.contract_id, "down payment created");
            } else {
                app_state.db.update_down_payment(&payment).await?;
                tracing::info!(payment_id = payment.id, "down payment updated");
            }

            let filter = down_payments_filter(app_state);
            load_down_payments_screen(app_state, &filter).await?;
            app_state.inform(format!("Down payment on {} saved", contract.contract_number));
        }
        None => {}
    }

    Ok(false)
}

// Expenses

fn expenses_filter(app_state: &AppState) -> String {
    app_state
        .expenses_state
        .as_ref()
        .map(|s| s.filter().to_string())
        .unwrap_or_default()
}

async fn load_expenses_screen(app_state: &mut AppState, filter: &str) -> Result<()> {
    let expenses = app_state.db.load_expenses().await?;

    app_state.expenses_state = Some(ExpensesState::new(expenses, app_state.is_admin()).with_filter(filter));
    app_state.screen = AppScreen::Expenses;

    Ok(())
}

async fn handle_expenses_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.expenses_state {
        Some(state) => handle_expenses_input(state)?,
        None => None,
    };

    match action {
        Some(ExpenseAction::Back) => load_dashboard_screen(app_state).await?,
        Some(ExpenseAction::NewExpense) => {
            let employees = app_state.db.load_employees().await?;
            let properties = app_state.db.load_properties().await?;
            app_state.expense_wizard_state = Some(ExpenseWizardState::new(&employees, &properties, today()));
            app_state.screen = AppScreen::ExpenseWizard;
        }
        Some(ExpenseAction::EditExpense(id)) => {
            let expense = app_state.db.get_expense(id).await?;
            let employees = app_state.db.load_employees().await?;
            let properties = app_state.db.load_properties().await?;
            app_state.expense_wizard_state =
                Some(ExpenseWizardState::from_existing(expense, &employees, &properties));
            app_state.screen = AppScreen::ExpenseWizard;
        }
        Some(ExpenseAction::DeleteExpense(id)) => {
            app_state.session()?.require_admin("delete expenses")?;
            app_state.db.delete_expense(id).await?;
            tracing::info!(expense_id = id, "expense deleted");

            let filter = expenses_filter(app_state);
            load_expenses_screen(app_state, &filter).await?;
            app_state.inform("Expense deleted");
        }
        None => {}
    }

    Ok(false)
}

async fn handle_expense_wizard_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.expense_wizard_state {
        Some(state) => handle_expense_wizard_input(state)?,
        None => None,
    };

    match action {
        Some(ExpenseWizardAction::Cancel) => {
            let filter = expenses_filter(app_state);
            load_expenses_screen(app_state, &filter).await?;
        }
        Some(ExpenseWizardAction::Save(expense)) => {
            if expense.id == 0 {
                let id = app_state.db.create_expense(&expense).await?;
                tracing::info!(expense_id = id, category = %expense.category, "expense created");
            } else {
                app_state.db.update_expense(&expense).await?;
                tracing::info!(expense_id = expense.id, "expense updated");
            }

            let filter = expenses_filter(app_state);
            load_expenses_screen(app_state, &filter).await?;
            app_state.inform("Expense saved");
        }
        None => {}
    }

    Ok(false)
}

// Reports

async fn load_reports_screen(app_state: &mut AppState) -> Result<()> {
    let data = ReportData {
        contracts: app_state.db.load_contracts().await?,
        employees: app_state.db.load_employees().await?,
        payments: app_state.db.load_down_payments().await?,
        expenses: app_state.db.load_expenses().await?,
    };

    app_state.reports_state = Some(ReportsState::new(data, today().year()));
    app_state.screen = AppScreen::Reports;

    Ok(())
}

async fn handle_reports_screen(app_state: &mut AppState) -> Result<bool> {
    let action = match &mut app_state.reports_state {
        Some(state) => handle_reports_input(state)?,
        None => None,
    };

    if let Some(ReportAction::Back) = action {
        load_dashboard_screen(app_state).await?;
    }

    Ok(false)
}
