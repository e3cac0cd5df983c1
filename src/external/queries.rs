pub const LOGIN: &str = r#"
mutation Login($email: String!, $password: String!) {
  login(loginInput: { email: $email, password: $password }) {
    access_token
    refresh_token
    user { id username email roles fullName }
  }
}"#;

pub const REGISTER: &str = r#"
mutation Register($input: RegisterInput!) {
  register(registerInput: $input) {
    access_token
    refresh_token
    user { id username email roles fullName }
  }
}"#;

pub const GET_TOUR_BY_ID: &str = r#"
query GetTourById($id: String!) {
  tour(id: $id) {
    id
    title
    description
    status
    createdAt
    tourSteps { id title description latitude longitude order }
  }
}"#;

pub const GET_TOURS_BY_GUIDE: &str = r#"
query GetToursByGuide($guideId: String!) {
  toursByGuide(guideId: $guideId) {
    id
    title
    description
    status
    createdAt
    tourSteps { id title description latitude longitude order }
  }
}"#;

pub const CREATE_TOUR: &str = r#"
mutation CreateTour($input: CreateTourInput!) {
  createTour(createTourInput: $input) { id title description }
}"#;

pub const UPDATE_TOUR: &str = r#"
mutation UpdateTour($input: UpdateTourInput!) {
  updateTour(updateTourInput: $input) { id title description }
}"#;

pub const DELETE_TOUR: &str = r#"
mutation DeleteTour($id: String!) {
  removeTour(id: $id) { success message }
}"#;

pub const CREATE_TOUR_STEP: &str = r#"
mutation CreateTourStep($input: CreateTourStepInput!) {
  createTourStep(input: $input) { id }
}"#;

pub const UPDATE_TOUR_STEP: &str = r#"
mutation UpdateTourStep($input: UpdateTourStepInput!) {
  updateTourStep(input: $input) { id }
}"#;

pub const DELETE_TOUR_STEP: &str = r#"
mutation DeleteTourStep($id: String!) {
  removeTourStep(id: $id) { success message }
}"#;
