//! Built-in machine learning engineer posting and four sample candidates

use crate::processing::document::{Candidate, Document, DocumentType};

const DEMO_JOB: &str = "\
Machine Learning Engineer - San Francisco, CA (Hybrid)

We are seeking a talented Machine Learning Engineer to join our AI team and help build
ML systems that power our products. You will design, implement and deploy machine
learning models at scale, working with cross-functional teams on data-driven solutions.

Requirements:
- 3+ years of experience in machine learning and data science
- Strong programming skills in Python, with experience in ML frameworks (TensorFlow, PyTorch, scikit-learn)
- Experience with cloud platforms (AWS, GCP, or Azure) and MLOps tools
- Solid understanding of statistics, linear algebra, and machine learning algorithms
- Experience with data preprocessing, feature engineering, and model evaluation
- Knowledge of deep learning architectures (CNNs, RNNs, Transformers)

Preferred Skills: Python, TensorFlow, PyTorch, AWS, GCP, Deep Learning, MLOps
Salary: $120,000 - $180,000
";

const SARAH_CHEN: &str = "\
Sarah Chen - Senior Machine Learning Engineer

5 years of experience in machine learning and AI development

Current Role: ML Engineer at TechCorp (2021-Present)
- Designed and deployed deep learning models using TensorFlow and PyTorch
- Built MLOps pipelines on AWS SageMaker for model deployment and monitoring
- Developed computer vision systems for image classification with 94% accuracy
- Led cross-functional team of 4 engineers on recommendation system project

Previous: Data Scientist at StartupAI (2019-2021)
- Implemented NLP models using transformers for text classification
- Feature engineering and model evaluation on large datasets with Python and scikit-learn

Education: Master's in Computer Science, Stanford University
Skills: Python, TensorFlow, PyTorch, AWS, GCP, Deep Learning, MLOps, Docker, Kubernetes
";

const MIKE_JOHNSON: &str = "\
Mike Johnson - Software Developer

2 years of experience in web development

Current Role: Full Stack Developer at WebCorp (2022-Present)
- Built web applications using React and Node.js
- Some Python for data analysis
- Basic knowledge of machine learning concepts

Education: Bachelor's in Computer Science, UC Berkeley
Skills: JavaScript, React, Node.js, Python, SQL, Git
";

const ALEX_RODRIGUEZ: &str = "\
Dr. Alex Rodriguez - AI Research Scientist

8 years of experience in machine learning research and development

Current Role: Principal AI Researcher at Google Research (2020-Present)
- Published 15+ papers in top-tier ML conferences (NeurIPS, ICML, ICLR)
- Expert in deep learning architectures, particularly Transformers and CNNs
- Developed novel algorithms for few-shot learning and meta-learning
- Distributed training systems with TensorFlow and PyTorch

Previous: Senior ML Engineer at Facebook AI (2016-2020)
- Built large-scale recommendation systems serving 1B+ users
- MLOps, model deployment, and A/B testing frameworks on AWS
- Led team of 8 researchers on computer vision projects

Education: PhD in Machine Learning, MIT
Skills: Python, TensorFlow, PyTorch, AWS, GCP, Deep Learning, Research, Statistics
";

const JENNIFER_LIU: &str = "\
Jennifer Liu - Data Analyst

3 years of experience in data analysis

Current Role: Senior Data Analyst at FinTech Inc (2021-Present)
- Performed statistical analysis using Python and R
- Created dashboards and reports for business stakeholders
- Basic machine learning with scikit-learn
- SQL and data preprocessing

Education: Master's in Statistics, UCLA
Skills: Python, R, SQL, scikit-learn, Pandas, Matplotlib
";

pub fn demo_job() -> Document {
    Document::new(DEMO_JOB, "demo: Machine Learning Engineer", DocumentType::JobDescription)
}

pub fn demo_candidates() -> Vec<Candidate> {
    [
        (1, "Sarah Chen", SARAH_CHEN),
        (2, "Mike Johnson", MIKE_JOHNSON),
        (3, "Dr. Alex Rodriguez", ALEX_RODRIGUEZ),
        (4, "Jennifer Liu", JENNIFER_LIU),
    ]
    .into_iter()
    .map(|(id, name, text)| Candidate::new(id, name, text))
    .collect()
}
